use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::action::{Action, ActionRef};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// Runs its children concurrently and completes when all of them have.
///
/// The longest child runs on the caller's context and is the only one
/// accounted against it, so a parallel spends at most its own duration of
/// skip-ahead and credits exactly its own duration of progress. The other
/// children run on [`branch`](ExecutionContext::branch) contexts that start
/// from the same skip-ahead budget.
///
/// The first failure (or cancellation of the context) drops the remaining
/// branches and propagates.
pub struct Parallel {
  children: Vec<ActionRef>,
}

impl Parallel {
  pub fn new(children: Vec<ActionRef>) -> Self {
    Self { children }
  }

  pub fn children(&self) -> &[ActionRef] {
    &self.children
  }
}

#[async_trait]
impl Action for Parallel {
  fn duration(&self) -> Duration {
    self
      .children
      .iter()
      .map(|child| child.duration())
      .max()
      .unwrap_or(Duration::ZERO)
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    context.check_cancelled()?;

    let duration = self.duration();
    let lead = self
      .children
      .iter()
      .position(|child| child.duration() == duration);

    // Branch contexts are taken before the lead spends any of the budget.
    let contexts: Vec<_> = (0..self.children.len())
      .map(|index| match lead {
        Some(lead) if lead == index => context.clone(),
        _ => context.branch(),
      })
      .collect();

    let branches = self
      .children
      .iter()
      .zip(&contexts)
      .map(|(child, context)| child.execute(context));

    tokio::select! {
      biased;
      _ = context.cancelled() => {
        warn!(branches = self.children.len(), "parallel cancelled");
        Err(RuntimeError::Cancelled)
      }
      result = futures::future::try_join_all(branches) => result.map(|_| ()),
    }
  }
}
