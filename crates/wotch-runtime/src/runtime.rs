//! Workout runtime.

use std::time::Duration;

use crate::action::{Action, ActionRef};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::execution::WorkoutExecution;

/// Execute an action tree against `context`.
///
/// A cancelled outcome always leaves the context cancelled, whichever node
/// observed it first.
pub async fn execute(action: &dyn Action, context: &ExecutionContext) -> Result<(), RuntimeError> {
  let result = action.execute(context).await;
  if matches!(result, Err(RuntimeError::Cancelled)) {
    context.cancel();
  }
  result
}

/// The workout runtime.
///
/// Owns the root of an action tree (typically a program) and hands out
/// executions of it.
pub struct WorkoutRuntime {
  pub(crate) action: ActionRef,
}

impl WorkoutRuntime {
  pub fn new(action: ActionRef) -> Self {
    Self { action }
  }

  /// Nominal duration of the whole tree.
  pub fn duration(&self) -> Duration {
    self.action.duration()
  }

  /// Start an execution against `context`.
  ///
  /// Returns a `WorkoutExecution` handle. Call `.wait()` to run it and get the
  /// summary.
  pub fn execute(&self, context: ExecutionContext) -> WorkoutExecution<'_> {
    let execution_id = uuid::Uuid::new_v4().to_string();

    WorkoutExecution::new(self, execution_id, context)
  }
}
