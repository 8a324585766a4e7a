//! Duration literals such as `1m 30s`, `90secs` or `250ms`.

use std::time::Duration;

use crate::error::ParseError;
use crate::source::Scanner;

const UNITS: &str = "duration unit (h, m, min, s, sec, ms)";

/// Parse a complete duration literal.
pub fn parse_duration(text: &str) -> Result<Duration, ParseError> {
  let mut scanner = Scanner::detached(text);
  let duration = duration(&mut scanner)?;
  scanner.expect_end()?;
  Ok(duration)
}

/// Consume one or more `<integer><unit>` components and sum them.
pub(crate) fn duration(scanner: &mut Scanner<'_>) -> Result<Duration, ParseError> {
  let start = *scanner;
  let mut total = Duration::ZERO;
  let mut components = 0;

  while scanner.peek_char().is_some_and(|c| c.is_ascii_digit()) {
    let component_start = *scanner;
    let value = scanner.integer("duration")?;

    scanner.skip_whitespace();
    let unit_start = *scanner;
    let unit = scanner.word().ok_or_else(|| unit_start.error(UNITS))?;
    let component = component(value, unit)
      .ok_or_else(|| unit_start.error(UNITS))?
      .ok_or_else(|| component_start.error("duration within range"))?;

    total = total
      .checked_add(component)
      .ok_or_else(|| component_start.error("duration within range"))?;
    components += 1;
  }

  if components == 0 {
    return Err(start.error("duration"));
  }
  Ok(total)
}

/// `None` for an unknown unit, `Some(None)` on overflow.
fn component(value: u64, unit: &str) -> Option<Option<Duration>> {
  let seconds_per_unit = match unit.to_ascii_lowercase().as_str() {
    "ms" => return Some(Some(Duration::from_millis(value))),
    "s" | "sec" | "secs" => 1,
    "m" | "min" | "mins" => 60,
    "h" => 3600,
    _ => return None,
  };
  Some(value.checked_mul(seconds_per_unit).map(Duration::from_secs))
}
