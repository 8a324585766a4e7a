//! Exercise timeline events.

use serde::{Deserialize, Serialize};

/// A point on an exercise's timeline.
///
/// Set and repetition numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
  BeforeExercise,
  BeforeSet { set: u32 },
  BeforeRepetition { set: u32, repetition: u32 },
  DuringRepetition { set: u32, repetition: u32 },
  AfterRepetition { set: u32, repetition: u32 },
  AfterSet { set: u32 },
  AfterExercise,
}

/// The tag of an [`Event`], without its indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
  BeforeExercise,
  BeforeSet,
  BeforeRepetition,
  DuringRepetition,
  AfterRepetition,
  AfterSet,
  AfterExercise,
}

impl EventKind {
  /// Whether events of this kind carry a repetition number.
  pub fn is_repetition(self) -> bool {
    matches!(
      self,
      Self::BeforeRepetition | Self::DuringRepetition | Self::AfterRepetition
    )
  }

  /// Whether events of this kind carry only a set number.
  pub fn is_set(self) -> bool {
    matches!(self, Self::BeforeSet | Self::AfterSet)
  }
}

impl Event {
  pub fn kind(&self) -> EventKind {
    match self {
      Self::BeforeExercise => EventKind::BeforeExercise,
      Self::BeforeSet { .. } => EventKind::BeforeSet,
      Self::BeforeRepetition { .. } => EventKind::BeforeRepetition,
      Self::DuringRepetition { .. } => EventKind::DuringRepetition,
      Self::AfterRepetition { .. } => EventKind::AfterRepetition,
      Self::AfterSet { .. } => EventKind::AfterSet,
      Self::AfterExercise => EventKind::AfterExercise,
    }
  }

  /// The set this event belongs to, if any.
  pub fn set(&self) -> Option<u32> {
    match self {
      Self::BeforeSet { set }
      | Self::AfterSet { set }
      | Self::BeforeRepetition { set, .. }
      | Self::DuringRepetition { set, .. }
      | Self::AfterRepetition { set, .. } => Some(*set),
      Self::BeforeExercise | Self::AfterExercise => None,
    }
  }

  /// The repetition this event belongs to, if any.
  pub fn repetition(&self) -> Option<u32> {
    match self {
      Self::BeforeRepetition { repetition, .. }
      | Self::DuringRepetition { repetition, .. }
      | Self::AfterRepetition { repetition, .. } => Some(*repetition),
      _ => None,
    }
  }
}

/// Build the full timeline of an exercise with the given shape.
pub fn timeline(set_count: u32, repetition_count: u32) -> Vec<Event> {
  let per_set = 2 + 3 * repetition_count as usize;
  let mut events = Vec::with_capacity(2 + per_set * set_count as usize);

  events.push(Event::BeforeExercise);
  for set in 1..=set_count {
    events.push(Event::BeforeSet { set });
    for repetition in 1..=repetition_count {
      events.push(Event::BeforeRepetition { set, repetition });
      events.push(Event::DuringRepetition { set, repetition });
      events.push(Event::AfterRepetition { set, repetition });
    }
    events.push(Event::AfterSet { set });
  }
  events.push(Event::AfterExercise);

  events
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_timeline_order() {
    let events = timeline(1, 2);
    assert_eq!(
      events,
      vec![
        Event::BeforeExercise,
        Event::BeforeSet { set: 1 },
        Event::BeforeRepetition { set: 1, repetition: 1 },
        Event::DuringRepetition { set: 1, repetition: 1 },
        Event::AfterRepetition { set: 1, repetition: 1 },
        Event::BeforeRepetition { set: 1, repetition: 2 },
        Event::DuringRepetition { set: 1, repetition: 2 },
        Event::AfterRepetition { set: 1, repetition: 2 },
        Event::AfterSet { set: 1 },
        Event::AfterExercise,
      ]
    );
  }

  #[test]
  fn test_timeline_without_sets() {
    assert_eq!(
      timeline(0, 5),
      vec![Event::BeforeExercise, Event::AfterExercise]
    );
  }

  #[test]
  fn test_timeline_length() {
    // 2 exercise events + 3 sets * (2 set events + 4 reps * 3 rep events)
    assert_eq!(timeline(3, 4).len(), 2 + 3 * (2 + 4 * 3));
  }

  #[test]
  fn test_indices() {
    let event = Event::AfterRepetition { set: 2, repetition: 7 };
    assert_eq!(event.kind(), EventKind::AfterRepetition);
    assert_eq!(event.set(), Some(2));
    assert_eq!(event.repetition(), Some(7));
    assert_eq!(Event::AfterExercise.set(), None);
  }
}
