use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wotch_host::Logger;

use crate::action::{Action, ActionRef};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// Starts its inner action without waiting for it.
///
/// The inner action runs as a detached tokio task on a
/// [`branch`](ExecutionContext::branch) of the context: it observes pause and
/// cancellation of the run, but its waits are not credited to the run's
/// progress or skip-ahead budget. Its failures are reported to the logger and never reach the caller.
pub struct DoNotAwait {
  logger: Arc<dyn Logger>,
  inner: ActionRef,
}

impl DoNotAwait {
  pub fn new(logger: Arc<dyn Logger>, inner: ActionRef) -> Self {
    Self { logger, inner }
  }

  pub fn inner(&self) -> &ActionRef {
    &self.inner
  }
}

#[async_trait]
impl Action for DoNotAwait {
  fn duration(&self) -> Duration {
    Duration::ZERO
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    let inner = Arc::clone(&self.inner);
    let logger = Arc::clone(&self.logger);
    let context = context.branch();

    let handle = tokio::spawn(async move { inner.execute(&context).await });

    tokio::spawn(async move {
      match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(RuntimeError::Cancelled)) => {
          debug!("detached action cancelled");
        }
        Ok(Err(e)) => {
          logger.error(&format!("failed to execute inner action: {}", e));
        }
        Err(e) => {
          logger.error(&format!("inner action panicked: {}", e));
        }
      }
    });

    Ok(())
  }
}
