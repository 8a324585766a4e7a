//! Run-scoped execution context.
//!
//! One [`ExecutionContext`] is created per run and shared by every action in
//! the tree as well as by external controllers (pause, resume, cancel). It
//! owns the skip-ahead budget and the progress counter, which are mutated
//! together under a single lock so concurrent branches never double-count.
//!
//! A [`Parallel`](crate::actions::Parallel) runs its shorter branches on
//! [`branch`](ExecutionContext::branch) contexts: they share pause,
//! cancellation, position and subscribers with the run but keep a private
//! ledger, so only the longest branch is accounted against the run.
//!
//! Changes are pushed to subscribers as [`ContextChange`] values. Each
//! subscriber gets its own unbounded channel and therefore sees every
//! intermediate value in order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;

/// A change to an observable field of the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextChange {
  Progress(Duration),
  SkipAheadRemaining(Duration),
  Paused(bool),
  Cancelled,
  CurrentExercise(String),
  CurrentSet(u32),
  CurrentRepetition(u32),
}

#[derive(Debug)]
struct Ledger {
  skip_ahead_remaining: Duration,
  progress: Duration,
}

#[derive(Debug, Default)]
struct Position {
  exercise: Option<String>,
  set: Option<u32>,
  repetition: Option<u32>,
}

struct Shared {
  position: Mutex<Position>,
  paused: watch::Sender<bool>,
  cancel: CancellationToken,
  cancel_published: AtomicBool,
  subscribers: Mutex<Vec<mpsc::UnboundedSender<ContextChange>>>,
}

/// Shared coordination state for a single workout run.
///
/// Cloning yields another handle to the same run.
#[derive(Clone)]
pub struct ExecutionContext {
  shared: Arc<Shared>,
  ledger: Arc<Mutex<Ledger>>,
  // Ledger changes of a branch are private and never published.
  detached: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ExecutionContext {
  /// Create a context with no skip-ahead.
  pub fn new() -> Self {
    Self::with_skip_ahead(Duration::ZERO)
  }

  /// Create a context that fast-forwards through the first `skip_ahead` of
  /// nominal workout time.
  pub fn with_skip_ahead(skip_ahead: Duration) -> Self {
    let (paused, _) = watch::channel(false);

    Self {
      shared: Arc::new(Shared {
        position: Mutex::new(Position::default()),
        paused,
        cancel: CancellationToken::new(),
        cancel_published: AtomicBool::new(false),
        subscribers: Mutex::new(Vec::new()),
      }),
      ledger: Arc::new(Mutex::new(Ledger {
        skip_ahead_remaining: skip_ahead,
        progress: Duration::ZERO,
      })),
      detached: false,
    }
  }

  /// Create a context for a concurrent branch.
  ///
  /// The branch starts with the current skip-ahead budget and zero progress.
  /// Pause, cancellation, position and subscribers are shared with `self`;
  /// skip-ahead and progress changes stay local to the branch.
  pub fn branch(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
      ledger: Arc::new(Mutex::new(Ledger {
        skip_ahead_remaining: self.skip_ahead_remaining(),
        progress: Duration::ZERO,
      })),
      detached: true,
    }
  }

  /// Subscribe to every subsequent change of the context.
  pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ContextChange> {
    let (sender, receiver) = mpsc::unbounded_channel();
    lock(&self.shared.subscribers).push(sender);
    receiver
  }

  fn publish(&self, change: ContextChange) {
    // Drop subscribers whose receiver has gone away.
    lock(&self.shared.subscribers).retain(|sender| sender.send(change.clone()).is_ok());
  }

  fn publish_ledger(&self, ledger: &Ledger) {
    if self.detached {
      return;
    }
    self.publish(ContextChange::SkipAheadRemaining(ledger.skip_ahead_remaining));
    self.publish(ContextChange::Progress(ledger.progress));
  }

  pub fn skip_ahead_remaining(&self) -> Duration {
    lock(&self.ledger).skip_ahead_remaining
  }

  pub fn progress(&self) -> Duration {
    lock(&self.ledger).progress
  }

  /// Consume up to `max` of the skip-ahead budget, crediting the same amount
  /// to progress. Returns the amount consumed.
  pub fn consume_skip_ahead(&self, max: Duration) -> Duration {
    let mut ledger = lock(&self.ledger);
    let consumed = ledger.skip_ahead_remaining.min(max);
    if consumed.is_zero() {
      return consumed;
    }

    ledger.skip_ahead_remaining -= consumed;
    ledger.progress += consumed;
    self.publish_ledger(&ledger);
    consumed
  }

  /// Skip an action of the given nominal duration if the budget covers all of
  /// it. Zero-length actions are never skipped.
  pub fn try_skip(&self, duration: Duration) -> bool {
    let mut ledger = lock(&self.ledger);
    if duration.is_zero() || ledger.skip_ahead_remaining < duration {
      return false;
    }

    ledger.skip_ahead_remaining -= duration;
    ledger.progress += duration;
    self.publish_ledger(&ledger);
    true
  }

  /// Credit time that was actually waited.
  pub fn add_progress(&self, elapsed: Duration) {
    if elapsed.is_zero() {
      return;
    }

    let mut ledger = lock(&self.ledger);
    ledger.progress += elapsed;
    if !self.detached {
      self.publish(ContextChange::Progress(ledger.progress));
    }
  }

  pub fn is_paused(&self) -> bool {
    *self.shared.paused.borrow()
  }

  pub fn set_paused(&self, paused: bool) {
    let changed = self.shared.paused.send_if_modified(|current| {
      if *current == paused {
        return false;
      }
      *current = paused;
      true
    });

    if changed {
      self.publish(ContextChange::Paused(paused));
    }
  }

  pub fn pause(&self) {
    self.set_paused(true);
  }

  pub fn resume(&self) {
    self.set_paused(false);
  }

  pub fn is_cancelled(&self) -> bool {
    self.shared.cancel.is_cancelled()
  }

  /// Signal cancellation. Idempotent; the flag never clears.
  pub fn cancel(&self) {
    self.shared.cancel.cancel();
    if !self.shared.cancel_published.swap(true, Ordering::SeqCst) {
      self.publish(ContextChange::Cancelled);
    }
  }

  /// The token handed to host capabilities so in-flight waits observe
  /// cancellation.
  pub fn cancellation(&self) -> &CancellationToken {
    &self.shared.cancel
  }

  /// Resolve once the context is cancelled.
  pub async fn cancelled(&self) {
    self.shared.cancel.cancelled().await
  }

  /// Return an error if the context has been cancelled.
  pub fn check_cancelled(&self) -> Result<(), RuntimeError> {
    if self.is_cancelled() {
      return Err(RuntimeError::Cancelled);
    }
    Ok(())
  }

  /// Suspend while the context is paused.
  ///
  /// Returns [`RuntimeError::Cancelled`] if cancellation arrives first.
  pub async fn wait_while_paused(&self) -> Result<(), RuntimeError> {
    self.check_cancelled()?;
    if !self.is_paused() {
      return Ok(());
    }

    let mut paused = self.shared.paused.subscribe();
    tokio::select! {
      biased;
      _ = self.shared.cancel.cancelled() => Err(RuntimeError::Cancelled),
      // The sender lives as long as `self`, so this cannot report a closed channel.
      _ = paused.wait_for(|paused| !*paused) => self.check_cancelled(),
    }
  }

  pub fn current_exercise(&self) -> Option<String> {
    lock(&self.shared.position).exercise.clone()
  }

  pub fn current_set(&self) -> Option<u32> {
    lock(&self.shared.position).set
  }

  pub fn current_repetition(&self) -> Option<u32> {
    lock(&self.shared.position).repetition
  }

  /// Mark an exercise as active, clearing the set and repetition of the
  /// previous one.
  pub fn set_current_exercise(&self, name: &str) {
    let mut position = lock(&self.shared.position);
    position.exercise = Some(name.to_string());
    position.set = None;
    position.repetition = None;
    self.publish(ContextChange::CurrentExercise(name.to_string()));
  }

  pub fn set_current_set(&self, set: u32) {
    let mut position = lock(&self.shared.position);
    position.set = Some(set);
    position.repetition = None;
    self.publish(ContextChange::CurrentSet(set));
  }

  pub fn set_current_repetition(&self, repetition: u32) {
    let mut position = lock(&self.shared.position);
    position.repetition = Some(repetition);
    self.publish(ContextChange::CurrentRepetition(repetition));
  }
}

impl Default for ExecutionContext {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for ExecutionContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let ledger = lock(&self.ledger);
    f.debug_struct("ExecutionContext")
      .field("skip_ahead_remaining", &ledger.skip_ahead_remaining)
      .field("progress", &ledger.progress)
      .field("detached", &self.detached)
      .field("paused", &self.is_paused())
      .field("cancelled", &self.is_cancelled())
      .finish()
  }
}
