//! Wotch Host
//!
//! Capabilities the workout runtime consumes but does not implement itself:
//!
//! - [`DelayService`] abstracts real time so execution can be driven
//!   deterministically under test.
//! - [`SpeechService`] announces exercise names and cues.
//! - [`Logger`] receives faults from detached work.
//!
//! [`Capabilities`] bundles one of each so the parser can hand them to the
//! actions it builds.

mod delay;
mod error;
mod log;
mod speech;

use std::sync::Arc;

pub use delay::{DelayService, TokioDelayService};
pub use error::HostError;
pub use log::{Logger, TracingLogger};
pub use speech::{LogSpeechService, SpeechService};

/// The set of host capabilities available to a workout.
#[derive(Clone)]
pub struct Capabilities {
  pub delay: Arc<dyn DelayService>,
  pub speech: Arc<dyn SpeechService>,
  pub logger: Arc<dyn Logger>,
}

impl Capabilities {
  /// Create a capability set from explicit implementations.
  pub fn new(
    delay: Arc<dyn DelayService>,
    speech: Arc<dyn SpeechService>,
    logger: Arc<dyn Logger>,
  ) -> Self {
    Self {
      delay,
      speech,
      logger,
    }
  }

  /// Capabilities backed by tokio timers and tracing output.
  pub fn system() -> Self {
    Self::new(
      Arc::new(TokioDelayService),
      Arc::new(LogSpeechService),
      Arc::new(TracingLogger),
    )
  }
}

impl Default for Capabilities {
  fn default() -> Self {
    Self::system()
  }
}
