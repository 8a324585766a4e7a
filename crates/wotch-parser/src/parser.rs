//! The workout parser.
//!
//! Recursive descent over lines. Every function that parses a block takes the
//! indentation depth it expects; nested blocks are parsed at `depth + 1` and
//! stop at the first line indented less.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use wotch_host::Capabilities;
use wotch_runtime::actions::{DoNotAwait, Parallel, Say, Sequence, Wait};
use wotch_runtime::{ActionRef, Exercise, MatcherWithAction, Program, RuntimeConfig, Workout};

use crate::duration::duration;
use crate::error::ParseError;
use crate::matcher::matcher;
use crate::source::{Cursor, Line, Scanner};

const PROGRAM_MARKER: &str = "#";
const EXERCISE_MARKER: &str = "##";

/// Compiles workout text into action trees.
///
/// Actions it builds are wired to the given capabilities, and waits use the
/// configured tick interval.
pub struct WorkoutParser {
  capabilities: Capabilities,
  config: RuntimeConfig,
}

impl WorkoutParser {
  pub fn new(capabilities: Capabilities, config: RuntimeConfig) -> Self {
    Self {
      capabilities,
      config,
    }
  }

  /// Parse a document of one or more programs.
  pub fn parse_workout(&self, text: &str) -> Result<Workout, ParseError> {
    let mut cursor = Cursor::new(text)?;
    let mut programs = Vec::new();

    while !cursor.is_done() {
      programs.push(self.program(&mut cursor)?);
    }
    if programs.is_empty() {
      return Err(cursor.end_error("program heading '#'"));
    }

    debug!(programs = programs.len(), "workout_parsed");
    Ok(Workout::new(programs))
  }

  /// Parse a single exercise: heading, sets line and matcher blocks.
  pub fn parse_exercise(&self, text: &str) -> Result<Exercise, ParseError> {
    let mut cursor = Cursor::new(text)?;
    let exercise = self.exercise(&mut cursor)?;
    cursor.expect_done()?;
    Ok(exercise)
  }

  /// Parse a list of actions written at `indent_level`.
  pub fn parse_actions(&self, text: &str, indent_level: usize) -> Result<Sequence, ParseError> {
    let mut cursor = Cursor::new(text)?;
    let actions = self.action_list(&mut cursor, indent_level)?;
    cursor.expect_done()?;
    Ok(Sequence::new(actions))
  }

  fn program(&self, cursor: &mut Cursor<'_>) -> Result<Program, ParseError> {
    let line = cursor
      .advance()
      .ok_or_else(|| cursor.end_error("program heading '#'"))?;
    let name = heading(line, PROGRAM_MARKER, "program heading '#'", "program name")?;

    let mut exercises = Vec::new();
    while let Some(next) = cursor.peek() {
      if next.depth == 0 && next.content.starts_with(EXERCISE_MARKER) {
        exercises.push(self.exercise(cursor)?);
      } else if next.depth == 0 && next.content.starts_with(PROGRAM_MARKER) {
        break;
      } else {
        return Err(Scanner::new(next).error("exercise heading '##'"));
      }
    }

    Program::new(name, exercises).map_err(|e| invalid(line, e))
  }

  fn exercise(&self, cursor: &mut Cursor<'_>) -> Result<Exercise, ParseError> {
    let line = cursor
      .advance()
      .ok_or_else(|| cursor.end_error("exercise heading '##'"))?;
    let name = heading(line, EXERCISE_MARKER, "exercise heading '##'", "exercise name")?;

    let sets_line = cursor
      .advance()
      .ok_or_else(|| cursor.end_error("sets line '* N sets x M reps'"))?;
    let (set_count, repetition_count) = sets(sets_line)?;

    let mut matchers = Vec::new();
    while let Some(next) = cursor.peek() {
      if next.depth == 0 && next.content.starts_with(PROGRAM_MARKER) {
        break;
      }
      if next.depth != 0 {
        return Err(indentation_error(next, 0));
      }
      matchers.push(self.matcher_block(cursor, 0, set_count, repetition_count)?);
    }

    debug!(exercise = %name, matchers = matchers.len(), "exercise_parsed");
    Exercise::new(
      Arc::clone(&self.capabilities.speech),
      name,
      set_count,
      repetition_count,
      matchers,
    )
    .map_err(|e| invalid(line, e))
  }

  fn matcher_block(
    &self,
    cursor: &mut Cursor<'_>,
    depth: usize,
    set_count: u32,
    repetition_count: u32,
  ) -> Result<MatcherWithAction, ParseError> {
    let line = cursor
      .advance()
      .ok_or_else(|| cursor.end_error("matcher"))?;
    let mut scanner = Scanner::new(line);
    scanner.expect("*")?;
    let matcher = matcher(&mut scanner, set_count, repetition_count)?;
    scanner.expect(":")?;
    scanner.expect_end()?;

    let mut actions = self.action_list(cursor, depth + 1)?;
    let action: ActionRef = if actions.len() == 1 {
      actions.remove(0)
    } else {
      Arc::new(Sequence::new(actions))
    };

    Ok(MatcherWithAction::new(matcher, action))
  }

  fn action_list(&self, cursor: &mut Cursor<'_>, depth: usize) -> Result<Vec<ActionRef>, ParseError> {
    let mut actions = Vec::new();

    while let Some(line) = cursor.peek() {
      if line.depth < depth || (line.depth == 0 && line.content.starts_with(PROGRAM_MARKER)) {
        break;
      }
      if line.depth > depth {
        return Err(indentation_error(line, depth));
      }
      cursor.advance();
      actions.push(self.action(cursor, line, depth)?);
    }

    if actions.is_empty() {
      let expected = format!("action indented by {} spaces", depth * 2);
      return Err(match cursor.peek() {
        Some(line) => Scanner::new(line).error(expected),
        None => cursor.end_error(expected),
      });
    }
    Ok(actions)
  }

  fn action(&self, cursor: &mut Cursor<'_>, line: Line<'_>, depth: usize) -> Result<ActionRef, ParseError> {
    let mut scanner = Scanner::new(line);
    scanner.expect("*")?;
    let at = scanner;

    if scanner.eat("wait") {
      scanner.expect("for")?;
      let delay = duration(&mut scanner)?;
      scanner.expect_end()?;
      return self.wait(delay, &at);
    }

    if scanner.eat("say") {
      let text = scanner.quoted()?;
      scanner.expect_end()?;
      return Ok(self.say(text));
    }

    if scanner.eat("break") {
      scanner.expect("for")?;
      let length = duration(&mut scanner)?;
      scanner.expect_end()?;
      return self.break_for(length, &at);
    }

    if scanner.eat("prepare") {
      scanner.expect("for")?;
      let length = duration(&mut scanner)?;
      scanner.expect_end()?;
      return self.prepare_for(length, &at);
    }

    if scanner.eat("sequence") {
      block_header(&mut scanner)?;
      let children = self.action_list(cursor, depth + 1)?;
      return Ok(Arc::new(Sequence::new(children)));
    }

    if scanner.eat("parallel") {
      block_header(&mut scanner)?;
      let children = self.action_list(cursor, depth + 1)?;
      return Ok(Arc::new(Parallel::new(children)));
    }

    if scanner.eat("don't") {
      scanner.expect("wait")?;
      block_header(&mut scanner)?;
      let children = self.action_list(cursor, depth + 1)?;
      return Ok(Arc::new(DoNotAwait::new(
        Arc::clone(&self.capabilities.logger),
        Arc::new(Sequence::new(children)),
      )));
    }

    Err(scanner.error(
      "action ('wait for', 'say', 'break for', 'prepare for', 'sequence:', 'parallel:' or \"don't wait:\")",
    ))
  }

  pub(crate) fn wait(&self, delay: Duration, at: &Scanner<'_>) -> Result<ActionRef, ParseError> {
    let tick_interval = self.config.tick_interval;
    let wait = Wait::new(Arc::clone(&self.capabilities.delay), delay)
      .with_tick_interval(tick_interval)
      .map_err(|_| {
        let mut error = at.error("tick interval greater than zero");
        error.found = format!("{tick_interval:?}");
        error
      })?;
    Ok(Arc::new(wait))
  }

  pub(crate) fn say(&self, text: impl Into<String>) -> ActionRef {
    Arc::new(Say::new(Arc::clone(&self.capabilities.speech), text))
  }
}

/// Name of a `#` / `##` heading.
fn heading<'a>(
  line: Line<'a>,
  marker: &str,
  expected: &str,
  name: &str,
) -> Result<&'a str, ParseError> {
  if line.depth != 0 {
    return Err(indentation_error(line, 0));
  }

  let Some(rest) = line.content.strip_prefix(marker) else {
    return Err(Scanner::new(line).error(expected));
  };
  if rest.starts_with('#') {
    return Err(Scanner::new(line).error(expected));
  }

  let title = rest.trim();
  if title.is_empty() {
    let mut scanner = Scanner::new(line);
    scanner.expect(marker)?;
    return Err(scanner.error(name));
  }
  Ok(title)
}

/// `* N sets x M reps`
fn sets(line: Line<'_>) -> Result<(u32, u32), ParseError> {
  if line.depth != 0 {
    return Err(indentation_error(line, 0));
  }

  let mut scanner = Scanner::new(line);
  scanner.expect("*")?;
  let set_count = scanner.count("set count")?;
  if !(scanner.eat("sets") || scanner.eat("set")) {
    return Err(scanner.error("'sets'"));
  }
  scanner.expect("x")?;
  let repetition_count = scanner.count("repetition count")?;
  if !(scanner.eat("reps") || scanner.eat("rep") || scanner.eat("repetitions")) {
    return Err(scanner.error("'reps'"));
  }
  scanner.expect_end()?;

  Ok((set_count, repetition_count))
}

fn block_header(scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
  scanner.expect(":")?;
  scanner.expect_end()
}

fn indentation_error(line: Line<'_>, depth: usize) -> ParseError {
  ParseError::new(
    line.number,
    1,
    format!("indentation of {} spaces", depth * 2),
    format!("{} spaces", line.indent),
  )
}

fn invalid(line: Line<'_>, error: wotch_runtime::RuntimeError) -> ParseError {
  ParseError::new(line.number, 1, "valid declaration", error.to_string())
}
