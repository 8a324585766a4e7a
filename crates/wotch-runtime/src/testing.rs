//! Test doubles for host capabilities and actions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use wotch_host::{Capabilities, DelayService, HostError, Logger, SpeechService};

use crate::action::Action;
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// Delay service that returns immediately and records every requested span.
#[derive(Default)]
pub struct RecordingDelayService {
  calls: Mutex<Vec<Duration>>,
  hook: Mutex<Option<CallHook>>,
}

impl RecordingDelayService {
  /// Run `hook` with the 0-based call index on every call, before returning.
  pub fn on_call(&self, hook: impl Fn(usize) + Send + Sync + 'static) {
    *self.hook.lock().unwrap() = Some(Box::new(hook));
  }

  pub fn calls(&self) -> Vec<Duration> {
    self.calls.lock().unwrap().clone()
  }

  pub fn total(&self) -> Duration {
    self.calls().iter().sum()
  }
}

#[async_trait]
impl DelayService for RecordingDelayService {
  async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), HostError> {
    let call = {
      let mut calls = self.calls.lock().unwrap();
      calls.push(duration);
      calls.len() - 1
    };

    if let Some(hook) = self.hook.lock().unwrap().as_ref() {
      hook(call);
    }

    if cancel.is_cancelled() {
      return Err(HostError::Cancelled);
    }
    Ok(())
  }
}

/// Speech service that records what it was asked to say.
#[derive(Default)]
pub struct RecordingSpeechService {
  spoken: Mutex<Vec<String>>,
}

impl RecordingSpeechService {
  pub fn spoken(&self) -> Vec<String> {
    self.spoken.lock().unwrap().clone()
  }
}

#[async_trait]
impl SpeechService for RecordingSpeechService {
  async fn speak(&self, text: &str, _cancel: &CancellationToken) -> Result<(), HostError> {
    self.spoken.lock().unwrap().push(text.to_string());
    Ok(())
  }
}

/// Logger that keeps its messages.
#[derive(Default)]
pub struct RecordingLogger {
  errors: Mutex<Vec<String>>,
}

impl RecordingLogger {
  pub fn errors(&self) -> Vec<String> {
    self.errors.lock().unwrap().clone()
  }
}

impl Logger for RecordingLogger {
  fn error(&self, message: &str) {
    self.errors.lock().unwrap().push(message.to_string());
  }

  fn info(&self, _message: &str) {}
}

/// How a [`MockAction`] behaves when executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
  Succeed,
  Fail,
  Panic,
  /// Wait until the context is cancelled.
  Hang,
}

/// Action with a configurable duration that counts its executions.
pub struct MockAction {
  duration: Duration,
  behavior: Behavior,
  executions: AtomicUsize,
}

impl MockAction {
  pub fn new(duration: Duration) -> Arc<Self> {
    Self::with_behavior(duration, Behavior::Succeed)
  }

  pub fn with_behavior(duration: Duration, behavior: Behavior) -> Arc<Self> {
    Arc::new(Self {
      duration,
      behavior,
      executions: AtomicUsize::new(0),
    })
  }

  pub fn executions(&self) -> usize {
    self.executions.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Action for MockAction {
  fn duration(&self) -> Duration {
    self.duration
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    self.executions.fetch_add(1, Ordering::SeqCst);
    match self.behavior {
      Behavior::Succeed => Ok(()),
      Behavior::Fail => Err(RuntimeError::fault("mock failure")),
      Behavior::Panic => panic!("mock panic"),
      Behavior::Hang => {
        context.cancelled().await;
        Err(RuntimeError::Cancelled)
      }
    }
  }
}

/// Capabilities wired to recording doubles.
pub struct TestHost {
  pub delay: Arc<RecordingDelayService>,
  pub speech: Arc<RecordingSpeechService>,
  pub logger: Arc<RecordingLogger>,
}

impl TestHost {
  pub fn new() -> Self {
    Self {
      delay: Arc::new(RecordingDelayService::default()),
      speech: Arc::new(RecordingSpeechService::default()),
      logger: Arc::new(RecordingLogger::default()),
    }
  }

  pub fn capabilities(&self) -> Capabilities {
    Capabilities::new(self.delay.clone(), self.speech.clone(), self.logger.clone())
  }
}
