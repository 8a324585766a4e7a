//! Speech capability.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::HostError;

/// Speaks text aloud.
#[async_trait]
pub trait SpeechService: Send + Sync {
  /// Speak `text`, returning once the utterance has finished.
  async fn speak(&self, text: &str, cancel: &CancellationToken) -> Result<(), HostError>;
}

/// Speech service that records utterances as tracing events instead of
/// synthesizing audio.
#[derive(Debug, Clone, Default)]
pub struct LogSpeechService;

#[async_trait]
impl SpeechService for LogSpeechService {
  async fn speak(&self, text: &str, cancel: &CancellationToken) -> Result<(), HostError> {
    if cancel.is_cancelled() {
      return Err(HostError::Cancelled);
    }

    info!(text = %text, "speak");
    Ok(())
  }
}
