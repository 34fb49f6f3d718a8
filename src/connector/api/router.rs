use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::ClassifyController;

pub struct Router<'a> {
    classify_controller: ClassifyController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            classify_controller: ClassifyController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Classify {
                text,
                channel,
                format,
            } => self.classify_controller.classify(text, channel, format).await,
            Commands::Serve { .. } => unreachable!("Serve command is handled separately in main"),
        }
    }
}
