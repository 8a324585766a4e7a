//! Delay capability.
//!
//! The runtime never sleeps directly. Every real wait goes through a
//! [`DelayService`] so tests can drive execution without wall-clock time.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HostError;

/// Waits for a span of time, honouring a cancellation token.
#[async_trait]
pub trait DelayService: Send + Sync {
  /// Wait for `duration`.
  ///
  /// Returns [`HostError::Cancelled`] if `cancel` fires first.
  async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), HostError>;
}

/// Delay service backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Default)]
pub struct TokioDelayService;

#[async_trait]
impl DelayService for TokioDelayService {
  async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), HostError> {
    tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(HostError::Cancelled),
      _ = tokio::time::sleep(duration) => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test(start_paused = true)]
  async fn test_delay_completes() {
    let service = TokioDelayService;
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    service
      .delay(Duration::from_millis(250), &cancel)
      .await
      .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(250));
  }

  #[tokio::test(start_paused = true)]
  async fn test_delay_observes_cancellation() {
    let service = TokioDelayService;
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(10)).await;
      trigger.cancel();
    });

    let result = service.delay(Duration::from_secs(60), &cancel).await;
    assert!(matches!(result, Err(HostError::Cancelled)));
  }

  #[tokio::test]
  async fn test_delay_with_cancelled_token_returns_immediately() {
    let service = TokioDelayService;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = service.delay(Duration::from_secs(60), &cancel).await;
    assert!(result.unwrap_err().is_cancelled());
  }
}
