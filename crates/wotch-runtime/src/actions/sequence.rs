use std::time::Duration;

use async_trait::async_trait;

use crate::action::{Action, ActionRef};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// Runs its children one after another.
pub struct Sequence {
  children: Vec<ActionRef>,
}

impl Sequence {
  pub fn new(children: Vec<ActionRef>) -> Self {
    Self { children }
  }

  pub fn children(&self) -> &[ActionRef] {
    &self.children
  }
}

impl std::fmt::Debug for Sequence {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sequence").finish_non_exhaustive()
  }
}

#[async_trait]
impl Action for Sequence {
  fn duration(&self) -> Duration {
    self.children.iter().map(|child| child.duration()).sum()
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    for child in &self.children {
      context.check_cancelled()?;
      child.execute(context).await?;
    }
    Ok(())
  }
}
