use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on (defaults to PORT, then 4000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Classify a single complaint and register it
    Classify {
        text: String,

        /// Channel the complaint arrived through (web, whatsapp, email)
        #[arg(short, long)]
        channel: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
