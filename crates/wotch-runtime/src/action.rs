//! The action abstraction.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// A composable unit of a workout.
#[async_trait]
pub trait Action: Send + Sync {
  /// Nominal duration: the time the action takes with no skip-ahead and no
  /// pauses.
  fn duration(&self) -> Duration;

  /// Execute the action against the run's shared context.
  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError>;
}

/// Shared handle to a node of an action tree.
pub type ActionRef = Arc<dyn Action>;

/// Execute `action` unless the skip-ahead budget covers its whole duration.
///
/// Zero-length actions always execute, which keeps announcements alive while
/// fast-forwarding through timed work.
pub(crate) async fn execute_or_skip(
  action: &dyn Action,
  context: &ExecutionContext,
) -> Result<bool, RuntimeError> {
  context.check_cancelled()?;

  if context.try_skip(action.duration()) {
    return Ok(false);
  }

  action.execute(context).await?;
  Ok(true)
}
