//! Line splitting and in-line scanning.
//!
//! Workout text is split into non-blank [`Line`]s whose indentation has been
//! converted to a depth (two spaces per level). A [`Cursor`] walks the lines;
//! a [`Scanner`] walks the content of one line.

use crate::error::ParseError;

const INDENT_WIDTH: usize = 2;

/// A non-blank source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
  /// 1-based line number.
  pub number: usize,
  pub depth: usize,
  /// Number of indentation characters before `content`.
  pub indent: usize,
  pub content: &'a str,
}

/// Split `text` into lines, dropping blank ones and validating indentation.
pub(crate) fn lines(text: &str) -> Result<Vec<Line<'_>>, ParseError> {
  let mut lines = Vec::new();

  for (index, raw) in text.split('\n').enumerate() {
    let number = index + 1;
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    if raw.trim().is_empty() {
      continue;
    }

    let indent = raw.len() - raw.trim_start_matches(' ').len();
    let rest = &raw[indent..];
    if rest.starts_with(char::is_whitespace) {
      return Err(ParseError::new(
        number,
        indent + 1,
        "indentation of spaces",
        describe_whitespace(rest),
      ));
    }
    if indent % INDENT_WIDTH != 0 {
      return Err(ParseError::new(
        number,
        1,
        format!("indentation in multiples of {INDENT_WIDTH} spaces"),
        format!("{indent} spaces"),
      ));
    }

    lines.push(Line {
      number,
      depth: indent / INDENT_WIDTH,
      indent,
      content: rest.trim_end(),
    });
  }

  Ok(lines)
}

fn describe_whitespace(text: &str) -> String {
  match text.chars().next() {
    Some('\t') => "tab".to_string(),
    Some(c) => format!("{:?}", c),
    None => "end of line".to_string(),
  }
}

/// Walks the lines of a document.
pub(crate) struct Cursor<'a> {
  lines: Vec<Line<'a>>,
  position: usize,
  end_line: usize,
}

impl<'a> Cursor<'a> {
  pub fn new(text: &'a str) -> Result<Self, ParseError> {
    Ok(Self {
      lines: lines(text)?,
      position: 0,
      end_line: text.lines().count(),
    })
  }

  pub fn peek(&self) -> Option<Line<'a>> {
    self.lines.get(self.position).copied()
  }

  pub fn advance(&mut self) -> Option<Line<'a>> {
    let line = self.peek()?;
    self.position += 1;
    Some(line)
  }

  pub fn is_done(&self) -> bool {
    self.position >= self.lines.len()
  }

  /// Error for input that ended while `expected` was still outstanding.
  pub fn end_error(&self, expected: impl Into<String>) -> ParseError {
    ParseError::new(self.end_line + 1, 1, expected, "end of input")
  }

  /// Fail unless every line has been consumed.
  pub fn expect_done(&self) -> Result<(), ParseError> {
    match self.peek() {
      None => Ok(()),
      Some(line) => Err(Scanner::new(line).error("end of input")),
    }
  }
}

/// Walks the content of a single line.
///
/// Keywords match case-insensitively and only on word boundaries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanner<'a> {
  number: usize,
  indent: usize,
  text: &'a str,
  position: usize,
}

impl<'a> Scanner<'a> {
  pub fn new(line: Line<'a>) -> Self {
    Self {
      number: line.number,
      indent: line.indent,
      text: line.content,
      position: 0,
    }
  }

  /// A scanner over free-standing text, reported as line 1.
  pub fn detached(text: &'a str) -> Self {
    Self {
      number: 1,
      indent: 0,
      text,
      position: 0,
    }
  }

  pub fn rest(&self) -> &'a str {
    &self.text[self.position..]
  }

  pub fn skip_whitespace(&mut self) {
    let rest = self.rest();
    self.position += rest.len() - rest.trim_start().len();
  }

  pub fn is_at_end(&mut self) -> bool {
    self.skip_whitespace();
    self.rest().is_empty()
  }

  pub fn peek_char(&mut self) -> Option<char> {
    self.skip_whitespace();
    self.rest().chars().next()
  }

  /// 1-based column of the next unconsumed character.
  pub fn column(&self) -> usize {
    self.indent + self.text[..self.position].chars().count() + 1
  }

  /// Consume `literal` if it comes next.
  pub fn eat(&mut self, literal: &str) -> bool {
    self.skip_whitespace();
    let rest = self.rest();
    if rest.len() < literal.len()
      || !rest.is_char_boundary(literal.len())
      || !rest[..literal.len()].eq_ignore_ascii_case(literal)
    {
      return false;
    }

    let ends_in_word = literal.chars().last().is_some_and(char::is_alphanumeric);
    let continues_word = rest[literal.len()..]
      .chars()
      .next()
      .is_some_and(char::is_alphanumeric);
    if ends_in_word && continues_word {
      return false;
    }

    self.position += literal.len();
    true
  }

  pub fn expect(&mut self, literal: &str) -> Result<(), ParseError> {
    if self.eat(literal) {
      return Ok(());
    }
    Err(self.error(format!("'{literal}'")))
  }

  pub fn expect_end(&mut self) -> Result<(), ParseError> {
    if self.is_at_end() {
      return Ok(());
    }
    Err(self.error("end of line"))
  }

  /// Consume a run of ASCII digits.
  pub fn integer(&mut self, expected: &str) -> Result<u64, ParseError> {
    self.skip_whitespace();
    let rest = self.rest();
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
      return Err(self.error(expected));
    }

    let value = rest[..digits]
      .parse::<u64>()
      .map_err(|_| self.error(format!("{expected} within range")))?;
    self.position += digits;
    Ok(value)
  }

  /// Like [`Scanner::integer`], narrowed to `u32`.
  pub fn count(&mut self, expected: &str) -> Result<u32, ParseError> {
    let start = *self;
    let value = self.integer(expected)?;
    u32::try_from(value).map_err(|_| start.error(format!("{expected} within range")))
  }

  /// Consume a run of ASCII letters.
  pub fn word(&mut self) -> Option<&'a str> {
    let rest = self.rest();
    let letters = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len();
    if letters == 0 {
      return None;
    }
    self.position += letters;
    Some(&rest[..letters])
  }

  /// Consume a single- or double-quoted string and return its contents.
  pub fn quoted(&mut self) -> Result<&'a str, ParseError> {
    let quote = match self.peek_char() {
      Some(quote @ ('\'' | '"')) => quote,
      _ => return Err(self.error("quoted text")),
    };

    let body = &self.rest()[1..];
    let Some(end) = body.find(quote) else {
      self.position = self.text.len();
      return Err(self.error(format!("closing {quote}")));
    };

    self.position += end + 2;
    Ok(&body[..end])
  }

  /// Error at the current position, describing the next token as found.
  pub fn error(&self, expected: impl Into<String>) -> ParseError {
    let mut at = *self;
    at.skip_whitespace();
    let found = match at.rest().split_whitespace().next() {
      Some(token) => format!("'{token}'"),
      None => "end of line".to_string(),
    };
    ParseError::new(at.number, at.column(), expected, found)
  }
}
