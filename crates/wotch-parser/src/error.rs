//! Parse errors.

/// The single error a failed parse produces.
///
/// `line` and `column` are 1-based and point at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: expected {expected}, found {found}")]
pub struct ParseError {
  pub line: usize,
  pub column: usize,
  pub expected: String,
  pub found: String,
}

impl ParseError {
  pub fn new(
    line: usize,
    column: usize,
    expected: impl Into<String>,
    found: impl Into<String>,
  ) -> Self {
    Self {
      line,
      column,
      expected: expected.into(),
      found: found.into(),
    }
  }
}
