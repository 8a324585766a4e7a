use thiserror::Error;

/// Errors surfaced by host capabilities.
#[derive(Debug, Error)]
pub enum HostError {
  /// The operation observed the cancellation token before completing.
  #[error("host operation cancelled")]
  Cancelled,

  /// Speech synthesis failed.
  #[error("speech failed: {message}")]
  Speech { message: String },

  /// The delay primitive failed.
  #[error("delay failed: {message}")]
  Delay { message: String },
}

impl HostError {
  /// Create a speech error.
  pub fn speech(message: impl Into<String>) -> Self {
    Self::Speech {
      message: message.into(),
    }
  }

  /// Create a delay error.
  pub fn delay(message: impl Into<String>) -> Self {
    Self::Delay {
      message: message.into(),
    }
  }

  /// Whether this error is the cancelled outcome rather than a fault.
  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Cancelled)
  }
}
