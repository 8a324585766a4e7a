//! Logging capability.
//!
//! Fire-and-forget work has no caller to return errors to, so failures are
//! handed to a [`Logger`] instead.

use tracing::{error, info};

/// Sink for messages that cannot be propagated to a caller.
pub trait Logger: Send + Sync {
  /// Report a failure.
  fn error(&self, message: &str);

  /// Report something informational.
  fn info(&self, message: &str);
}

/// Logger that forwards to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
  fn error(&self, message: &str) {
    error!(target: "wotch", "{}", message);
  }

  fn info(&self, message: &str) {
    info!(target: "wotch", "{}", message);
  }
}
