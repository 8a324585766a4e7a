//! Event matchers.
//!
//! A matcher is a predicate over [`Event`]s. Exercises pair each matcher with
//! the action to run whenever it fires.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::action::ActionRef;
use crate::event::{Event, EventKind};

/// Predicate over timeline events.
pub trait EventMatcher: Send + Sync {
  fn matches(&self, event: &Event) -> bool;
}

impl<F> EventMatcher for F
where
  F: Fn(&Event) -> bool + Send + Sync,
{
  fn matches(&self, event: &Event) -> bool {
    self(event)
  }
}

impl std::fmt::Debug for dyn EventMatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("EventMatcher")
  }
}

/// Matches every event of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedEventMatcher {
  kind: EventKind,
}

impl TypedEventMatcher {
  pub fn new(kind: EventKind) -> Self {
    Self { kind }
  }

  pub fn kind(&self) -> EventKind {
    self.kind
  }
}

impl EventMatcher for TypedEventMatcher {
  fn matches(&self, event: &Event) -> bool {
    event.kind() == self.kind
  }
}

/// Selects set or repetition numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFilter {
  Single(u32),
  Range(RangeInclusive<u32>),
}

impl NumberFilter {
  pub fn contains(&self, number: u32) -> bool {
    match self {
      Self::Single(n) => *n == number,
      Self::Range(range) => range.contains(&number),
    }
  }
}

/// Matches events of one kind whose number passes a filter.
///
/// Repetition events are filtered on their repetition number, set events on
/// their set number. Exercise-level events never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedEventMatcher {
  kind: EventKind,
  filter: NumberFilter,
}

impl NumberedEventMatcher {
  pub fn new(kind: EventKind, filter: NumberFilter) -> Self {
    Self { kind, filter }
  }
}

impl EventMatcher for NumberedEventMatcher {
  fn matches(&self, event: &Event) -> bool {
    if event.kind() != self.kind {
      return false;
    }

    let number = if self.kind.is_repetition() {
      event.repetition()
    } else {
      event.set()
    };

    number.is_some_and(|n| self.filter.contains(n))
  }
}

/// A matcher paired with the action it triggers.
#[derive(Clone)]
pub struct MatcherWithAction {
  pub matcher: Arc<dyn EventMatcher>,
  pub action: ActionRef,
}

impl MatcherWithAction {
  pub fn new(matcher: Arc<dyn EventMatcher>, action: ActionRef) -> Self {
    Self { matcher, action }
  }
}
