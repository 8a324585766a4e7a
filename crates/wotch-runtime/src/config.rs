//! Runtime configuration.

use std::time::Duration;

use crate::error::RuntimeError;

/// Default polling increment for real waits.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration shared by the actions of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
  /// Largest slice of real time a wait hands to the delay service before
  /// re-checking pause and cancellation.
  pub tick_interval: Duration,
}

impl RuntimeConfig {
  /// Create a configuration with the given tick interval.
  ///
  /// # Errors
  /// Returns an error if `tick_interval` is zero.
  pub fn new(tick_interval: Duration) -> Result<Self, RuntimeError> {
    if tick_interval.is_zero() {
      return Err(RuntimeError::InvalidConfig {
        message: "tick interval must be greater than zero".to_string(),
      });
    }

    Ok(Self { tick_interval })
  }
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      tick_interval: DEFAULT_TICK_INTERVAL,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_tick() {
    assert_eq!(RuntimeConfig::default().tick_interval, Duration::from_millis(100));
  }

  #[test]
  fn test_zero_tick_rejected() {
    let result = RuntimeConfig::new(Duration::ZERO);
    assert!(matches!(result, Err(RuntimeError::InvalidConfig { .. })));
  }
}
