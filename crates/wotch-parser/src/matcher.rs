//! Matcher headings: `before:`, `during rep:`, `after last set:`,
//! `before sets 2..3:` and friends.

use std::sync::Arc;

use wotch_runtime::{EventKind, EventMatcher, NumberFilter, NumberedEventMatcher, TypedEventMatcher};

use crate::error::ParseError;
use crate::source::Scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timing {
  Before,
  During,
  After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
  Set,
  Repetition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordinal {
  First,
  Last,
}

/// Consume a matcher heading up to (not including) its `:`.
///
/// `first` and `last` resolve against `set_count` or `repetition_count`.
pub(crate) fn matcher(
  scanner: &mut Scanner<'_>,
  set_count: u32,
  repetition_count: u32,
) -> Result<Arc<dyn EventMatcher>, ParseError> {
  let timing = timing(scanner)?;

  if scanner.peek_char() == Some(':') {
    return match timing {
      Timing::Before => Ok(Arc::new(TypedEventMatcher::new(EventKind::BeforeExercise))),
      Timing::After => Ok(Arc::new(TypedEventMatcher::new(EventKind::AfterExercise))),
      Timing::During => Err(scanner.error("'rep'")),
    };
  }

  let ordinal = ordinal(scanner);
  let unit_start = *scanner;
  let unit = unit(scanner)?;
  let kind = match (timing, unit) {
    (Timing::Before, Unit::Set) => EventKind::BeforeSet,
    (Timing::After, Unit::Set) => EventKind::AfterSet,
    (Timing::During, Unit::Set) => return Err(unit_start.error("'rep' after 'during'")),
    (Timing::Before, Unit::Repetition) => EventKind::BeforeRepetition,
    (Timing::During, Unit::Repetition) => EventKind::DuringRepetition,
    (Timing::After, Unit::Repetition) => EventKind::AfterRepetition,
  };

  let count = match unit {
    Unit::Set => set_count,
    Unit::Repetition => repetition_count,
  };

  let filter = match ordinal {
    Some(ordinal) => Some(resolve(ordinal, count)),
    None => filter(scanner, unit, count)?,
  };

  Ok(match filter {
    Some(filter) => Arc::new(NumberedEventMatcher::new(kind, filter)),
    None => Arc::new(TypedEventMatcher::new(kind)),
  })
}

fn timing(scanner: &mut Scanner<'_>) -> Result<Timing, ParseError> {
  if scanner.eat("before") {
    Ok(Timing::Before)
  } else if scanner.eat("during") {
    Ok(Timing::During)
  } else if scanner.eat("after") {
    Ok(Timing::After)
  } else {
    Err(scanner.error("'before', 'during' or 'after'"))
  }
}

fn ordinal(scanner: &mut Scanner<'_>) -> Option<Ordinal> {
  if scanner.eat("first") {
    Some(Ordinal::First)
  } else if scanner.eat("last") {
    Some(Ordinal::Last)
  } else {
    None
  }
}

fn unit(scanner: &mut Scanner<'_>) -> Result<Unit, ParseError> {
  for literal in ["sets", "set"] {
    if scanner.eat(literal) {
      return Ok(Unit::Set);
    }
  }
  for literal in ["repetitions", "repetition", "reps", "rep"] {
    if scanner.eat(literal) {
      return Ok(Unit::Repetition);
    }
  }
  Err(scanner.error("'set' or 'rep'"))
}

fn resolve(ordinal: Ordinal, count: u32) -> NumberFilter {
  match ordinal {
    Ordinal::First => NumberFilter::Single(1),
    Ordinal::Last => NumberFilter::Single(count),
  }
}

fn filter(
  scanner: &mut Scanner<'_>,
  unit: Unit,
  count: u32,
) -> Result<Option<NumberFilter>, ParseError> {
  if let Some(ordinal) = ordinal(scanner) {
    return Ok(Some(resolve(ordinal, count)));
  }
  if !scanner.peek_char().is_some_and(|c| c.is_ascii_digit()) {
    return Ok(None);
  }

  let expected = match unit {
    Unit::Set => format!("set number between 1 and {count}"),
    Unit::Repetition => format!("repetition number between 1 and {count}"),
  };

  let first_start = *scanner;
  let first = scanner.count(&expected)?;
  if !(1..=count).contains(&first) {
    return Err(first_start.error(expected));
  }

  if !scanner.eat("..") {
    return Ok(Some(NumberFilter::Single(first)));
  }

  let last_start = *scanner;
  let last = scanner.count(&expected)?;
  if !(first..=count).contains(&last) {
    return Err(last_start.error(format!("{expected}, not below {first}")));
  }

  Ok(Some(NumberFilter::Range(first..=last)))
}
