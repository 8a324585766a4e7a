//! Workout execution.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::runtime::{WorkoutRuntime, execute};

/// Result of a completed workout execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
  /// Unique execution ID.
  pub execution_id: String,
  /// Nominal time covered, skipped time included.
  pub progress: Duration,
  /// Skip-ahead budget left unspent.
  pub skip_ahead_remaining: Duration,
}

/// A handle to a workout execution.
///
/// Call `.wait()` to run the execution and get the summary.
pub struct WorkoutExecution<'a> {
  runtime: &'a WorkoutRuntime,
  execution_id: String,
  context: ExecutionContext,
}

impl<'a> WorkoutExecution<'a> {
  pub(crate) fn new(
    runtime: &'a WorkoutRuntime,
    execution_id: String,
    context: ExecutionContext,
  ) -> Self {
    Self {
      runtime,
      execution_id,
      context,
    }
  }

  pub fn execution_id(&self) -> &str {
    &self.execution_id
  }

  /// Another handle to the run's context, for pausing or cancelling it.
  pub fn context(&self) -> ExecutionContext {
    self.context.clone()
  }

  /// Wait for the workout to complete.
  #[instrument(
    name = "workout_execute",
    skip(self),
    fields(execution_id = %self.execution_id)
  )]
  pub async fn wait(self) -> Result<ExecutionSummary, RuntimeError> {
    info!(
      execution_id = %self.execution_id,
      duration = ?self.runtime.duration(),
      skip_ahead = ?self.context.skip_ahead_remaining(),
      "workout_started"
    );

    let result = execute(self.runtime.action.as_ref(), &self.context).await;

    match &result {
      Ok(()) => {
        info!(
          execution_id = %self.execution_id,
          progress = ?self.context.progress(),
          "workout_completed"
        );
      }
      Err(RuntimeError::Cancelled) => {
        warn!(
          execution_id = %self.execution_id,
          progress = ?self.context.progress(),
          "workout_cancelled"
        );
      }
      Err(e) => {
        error!(
          execution_id = %self.execution_id,
          error = %e,
          "workout_failed"
        );
      }
    }

    result.map(|()| ExecutionSummary {
      execution_id: self.execution_id.clone(),
      progress: self.context.progress(),
      skip_ahead_remaining: self.context.skip_ahead_remaining(),
    })
  }
}
