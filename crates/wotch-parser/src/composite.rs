//! Composite actions: `break for` and `prepare for`.
//!
//! Both are a timed wait running alongside a spoken track, so their nominal
//! duration is exactly the authored one.

use std::sync::Arc;
use std::time::Duration;

use wotch_runtime::ActionRef;
use wotch_runtime::actions::{Parallel, Sequence};

use crate::error::ParseError;
use crate::parser::WorkoutParser;
use crate::source::Scanner;

const BREAK_READY_LEAD: Duration = Duration::from_secs(10);
const PREPARE_COUNTDOWN: u64 = 3;

impl WorkoutParser {
  /// `break for D`: announce the break and call "ready?" ten seconds before
  /// it ends.
  pub(crate) fn break_for(&self, duration: Duration, at: &Scanner<'_>) -> Result<ActionRef, ParseError> {
    let mut track = vec![self.say("break")];
    if duration > BREAK_READY_LEAD {
      track.push(self.wait(duration - BREAK_READY_LEAD, at)?);
      track.push(self.say("ready?"));
    }

    Ok(Arc::new(Parallel::new(vec![
      self.wait(duration, at)?,
      Arc::new(Sequence::new(track)),
    ])))
  }

  /// `prepare for D`: announce, then count down the last three seconds.
  pub(crate) fn prepare_for(&self, duration: Duration, at: &Scanner<'_>) -> Result<ActionRef, ParseError> {
    let countdown = Duration::from_secs(PREPARE_COUNTDOWN);
    let mut track = vec![self.say("prepare")];
    if duration >= countdown {
      track.push(self.wait(duration - countdown, at)?);
      for remaining in (1..=PREPARE_COUNTDOWN).rev() {
        track.push(self.say(remaining.to_string()));
        if remaining > 1 {
          track.push(self.wait(Duration::from_secs(1), at)?);
        }
      }
    }

    Ok(Arc::new(Parallel::new(vec![
      self.wait(duration, at)?,
      Arc::new(Sequence::new(track)),
    ])))
  }
}
