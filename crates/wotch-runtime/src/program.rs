//! Programs and workouts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::action::{Action, execute_or_skip};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::exercise::Exercise;

/// A named, ordered list of exercises.
#[derive(Debug)]
pub struct Program {
  name: String,
  exercises: Vec<Exercise>,
}

impl Program {
  /// Create a program.
  ///
  /// # Errors
  /// Returns an error if `name` is blank.
  pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Result<Self, RuntimeError> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(RuntimeError::invalid_action("program name must not be blank"));
    }
    Ok(Self { name, exercises })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn exercises(&self) -> &[Exercise] {
    &self.exercises
  }
}

#[async_trait]
impl Action for Program {
  fn duration(&self) -> Duration {
    self.exercises.iter().map(|exercise| exercise.duration()).sum()
  }

  #[instrument(name = "program_execute", skip(self, context), fields(program = %self.name))]
  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    info!(exercises = self.exercises.len(), "program_started");

    for exercise in &self.exercises {
      if !execute_or_skip(exercise, context).await? {
        debug!(exercise = %exercise.name(), "exercise_skipped");
      }
    }

    info!(progress = ?context.progress(), "program_completed");
    Ok(())
  }
}

/// A parsed workout document.
#[derive(Debug)]
pub struct Workout {
  programs: Vec<Arc<Program>>,
}

impl Workout {
  pub fn new(programs: Vec<Program>) -> Self {
    Self {
      programs: programs.into_iter().map(Arc::new).collect(),
    }
  }

  pub fn programs(&self) -> &[Arc<Program>] {
    &self.programs
  }

  /// Look up a program by name, ignoring case.
  pub fn program(&self, name: &str) -> Option<Arc<Program>> {
    self
      .programs
      .iter()
      .find(|program| program.name().eq_ignore_ascii_case(name.trim()))
      .cloned()
  }
}
