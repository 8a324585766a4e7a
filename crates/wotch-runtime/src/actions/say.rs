use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wotch_host::SpeechService;

use crate::action::Action;
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// Speaks a phrase. Takes no nominal time, so it survives skip-ahead.
pub struct Say {
  speech: Arc<dyn SpeechService>,
  text: String,
}

impl Say {
  pub fn new(speech: Arc<dyn SpeechService>, text: impl Into<String>) -> Self {
    Self {
      speech,
      text: text.into(),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}

#[async_trait]
impl Action for Say {
  fn duration(&self) -> Duration {
    Duration::ZERO
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    context.check_cancelled()?;
    self
      .speech
      .speak(&self.text, context.cancellation())
      .await
      .map_err(RuntimeError::from)
  }
}
