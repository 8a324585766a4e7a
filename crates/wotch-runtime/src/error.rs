//! Runtime errors.

use wotch_host::HostError;

/// Errors that can occur while building or executing an action tree.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
  /// Execution was cancelled.
  #[error("execution cancelled")]
  Cancelled,

  /// A host capability failed.
  #[error("host capability failed: {source}")]
  Host {
    #[source]
    source: HostError,
  },

  /// An action was constructed with invalid arguments.
  #[error("invalid action: {message}")]
  InvalidAction { message: String },

  /// Runtime configuration was rejected.
  #[error("invalid configuration: {message}")]
  InvalidConfig { message: String },

  /// An action failed while executing.
  #[error("action failed: {message}")]
  Fault { message: String },
}

impl RuntimeError {
  /// Create a fault error.
  pub fn fault(message: impl Into<String>) -> Self {
    Self::Fault {
      message: message.into(),
    }
  }

  /// Create an invalid action error.
  pub fn invalid_action(message: impl Into<String>) -> Self {
    Self::InvalidAction {
      message: message.into(),
    }
  }

  /// Whether this is the cancelled outcome rather than a fault.
  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Cancelled)
  }
}

impl From<HostError> for RuntimeError {
  fn from(source: HostError) -> Self {
    match source {
      HostError::Cancelled => Self::Cancelled,
      source => Self::Host { source },
    }
  }
}
