use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use postventa::{serve, Commands, Container, ContainerConfig, Router, ServerConfig};

#[derive(Parser)]
#[command(name = "postventa")]
#[command(author, version, about = "Classify after-sales complaints with a language model", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the offline keyword classifier instead of calling the model API
    #[arg(long, global = true)]
    mock_model: bool,

    #[command(subcommand)]
    command: Commands,
}

fn log_level(verbose: bool, configured: &str) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    configured.trim().parse().unwrap_or(Level::INFO)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ContainerConfig::from_env();
    config.mock_model = cli.mock_model;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose, &config.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Serve { port, public } = cli.command {
        if let Some(port) = port {
            config.port = port;
        }
        let server_config = ServerConfig::new(config.port, public);
        info!(
            "Starting API ({} environment, model {})",
            config.environment.as_str(),
            if config.mock_model { "mock" } else { config.model.as_str() }
        );
        let container = Arc::new(Container::new(config)?);
        return serve(&server_config, container).await;
    }

    let container = Container::new(config)?;
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
