mod normalizer;
mod prompt;
mod sanitizer;

pub use normalizer::*;
pub use prompt::*;
pub use sanitizer::*;
