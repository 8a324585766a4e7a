use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wotch_host::DelayService;

use crate::action::Action;
use crate::config::DEFAULT_TICK_INTERVAL;
use crate::context::ExecutionContext;
use crate::error::RuntimeError;

/// Waits for a fixed span of nominal time.
///
/// Any skip-ahead budget is spent first; the remainder is waited out in
/// `tick_interval` slices so pause and cancellation are observed between
/// slices.
pub struct Wait {
  delay_service: Arc<dyn DelayService>,
  delay: Duration,
  tick_interval: Duration,
}

impl Wait {
  pub fn new(delay_service: Arc<dyn DelayService>, delay: Duration) -> Self {
    Self {
      delay_service,
      delay,
      tick_interval: DEFAULT_TICK_INTERVAL,
    }
  }

  /// Use a different polling increment.
  ///
  /// # Errors
  /// Returns an error if `tick_interval` is zero.
  pub fn with_tick_interval(mut self, tick_interval: Duration) -> Result<Self, RuntimeError> {
    if tick_interval.is_zero() {
      return Err(RuntimeError::invalid_action("wait tick interval must be greater than zero"));
    }
    self.tick_interval = tick_interval;
    Ok(self)
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }
}

#[async_trait]
impl Action for Wait {
  fn duration(&self) -> Duration {
    self.delay
  }

  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    let skipped = context.consume_skip_ahead(self.delay);
    let mut remaining = self.delay - skipped;

    if !skipped.is_zero() {
      debug!(delay = ?self.delay, skipped = ?skipped, "wait_skipped_ahead");
    }

    while !remaining.is_zero() {
      context.wait_while_paused().await?;

      let step = remaining.min(self.tick_interval);
      if let Err(e) = self.delay_service.delay(step, context.cancellation()).await {
        let error = RuntimeError::from(e);
        if error.is_cancelled() {
          context.cancel();
        }
        return Err(error);
      }

      context.add_progress(step);
      remaining -= step;
    }

    context.check_cancelled()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::RecordingDelayService;

  fn wait(delay_service: &Arc<RecordingDelayService>, delay: Duration) -> Wait {
    Wait::new(delay_service.clone(), delay)
  }

  #[test]
  fn test_duration_is_the_delay() {
    let delay_service = Arc::new(RecordingDelayService::default());
    for ms in [0, 100, 1000, 23498] {
      let sut = wait(&delay_service, Duration::from_millis(ms));
      assert_eq!(sut.duration(), Duration::from_millis(ms));
    }
  }

  #[test]
  fn test_zero_tick_rejected() {
    let delay_service = Arc::new(RecordingDelayService::default());
    let result = wait(&delay_service, Duration::from_secs(1)).with_tick_interval(Duration::ZERO);
    assert!(matches!(result, Err(RuntimeError::InvalidAction { .. })));
  }

  #[tokio::test]
  async fn test_waits_for_the_full_delay() {
    for ms in [0, 100, 1000, 23498] {
      let delay_service = Arc::new(RecordingDelayService::default());
      let sut = wait(&delay_service, Duration::from_millis(ms));

      sut.execute(&ExecutionContext::new()).await.unwrap();

      assert_eq!(delay_service.total(), Duration::from_millis(ms));
    }
  }

  #[tokio::test]
  async fn test_waits_in_tick_sized_slices() {
    let delay_service = Arc::new(RecordingDelayService::default());
    let sut = wait(&delay_service, Duration::from_millis(350))
      .with_tick_interval(Duration::from_millis(100))
      .unwrap();

    sut.execute(&ExecutionContext::new()).await.unwrap();

    assert_eq!(
      delay_service.calls(),
      vec![
        Duration::from_millis(100),
        Duration::from_millis(100),
        Duration::from_millis(100),
        Duration::from_millis(50),
      ]
    );
  }

  #[tokio::test]
  async fn test_skip_ahead_shortens_the_real_wait() {
    for (delay_ms, skip_ms, expected_ms) in [(850, 800, 50), (850, 849, 1), (3478, 2921, 557)] {
      let delay_service = Arc::new(RecordingDelayService::default());
      let sut = wait(&delay_service, Duration::from_millis(delay_ms));
      let context = ExecutionContext::with_skip_ahead(Duration::from_millis(skip_ms));

      sut.execute(&context).await.unwrap();

      assert_eq!(delay_service.total(), Duration::from_millis(expected_ms));
      assert_eq!(context.skip_ahead_remaining(), Duration::ZERO);
      assert_eq!(context.progress(), Duration::from_millis(delay_ms));
    }
  }

  #[tokio::test]
  async fn test_skip_ahead_is_consumed_even_while_paused() {
    for (delay_ms, skip_ms) in [(850, 800), (850, 849), (3478, 2921)] {
      let delay_service = Arc::new(RecordingDelayService::default());
      let sut = Arc::new(wait(&delay_service, Duration::from_millis(delay_ms)));
      let context = ExecutionContext::with_skip_ahead(Duration::from_millis(skip_ms));
      context.pause();

      let task = {
        let sut = sut.clone();
        let context = context.clone();
        tokio::spawn(async move { sut.execute(&context).await })
      };

      tokio::time::sleep(Duration::from_millis(50)).await;
      assert!(!task.is_finished());
      assert_eq!(context.progress(), Duration::from_millis(skip_ms));
      assert_eq!(delay_service.total(), Duration::ZERO);

      context.cancel();
      let result = task.await.unwrap();
      assert!(matches!(result, Err(RuntimeError::Cancelled)));
    }
  }

  #[tokio::test]
  async fn test_fully_covered_wait_completes_while_paused() {
    let delay_service = Arc::new(RecordingDelayService::default());
    let sut = wait(&delay_service, Duration::from_millis(50));
    let context = ExecutionContext::with_skip_ahead(Duration::from_millis(100));
    context.pause();

    sut.execute(&context).await.unwrap();

    assert_eq!(delay_service.total(), Duration::ZERO);
    assert_eq!(context.progress(), Duration::from_millis(50));
    assert_eq!(context.skip_ahead_remaining(), Duration::from_millis(50));
  }

  #[tokio::test]
  async fn test_reports_progress() {
    let delay_service = Arc::new(RecordingDelayService::default());
    let sut = wait(&delay_service, Duration::from_millis(50));
    let context = ExecutionContext::new();

    assert_eq!(context.progress(), Duration::ZERO);
    sut.execute(&context).await.unwrap();
    assert_eq!(context.progress(), Duration::from_millis(50));
  }

  #[tokio::test]
  async fn test_bails_out_when_cancelled() {
    let context = ExecutionContext::new();
    let delay_service = Arc::new(RecordingDelayService::default());
    {
      let context = context.clone();
      delay_service.on_call(move |call| {
        if call == 2 {
          context.cancel();
        }
      });
    }
    let sut = wait(&delay_service, Duration::from_secs(50));

    let result = sut.execute(&context).await;

    assert!(matches!(result, Err(RuntimeError::Cancelled)));
    assert!(context.is_cancelled());
    assert_eq!(delay_service.calls().len(), 3);
  }

  #[tokio::test]
  async fn test_pauses_when_context_is_paused() {
    let context = ExecutionContext::new();
    let delay_service = Arc::new(RecordingDelayService::default());
    {
      let context = context.clone();
      delay_service.on_call(move |call| {
        if call == 2 {
          context.pause();
        }
      });
    }
    let sut = Arc::new(wait(&delay_service, Duration::from_secs(50)));

    let task = {
      let sut = sut.clone();
      let context = context.clone();
      tokio::spawn(async move { sut.execute(&context).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());
    assert!(context.is_paused());

    let frozen = context.progress();
    assert_eq!(frozen, Duration::from_millis(300));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(context.progress(), frozen);

    context.resume();
    task.await.unwrap().unwrap();
    assert_eq!(context.progress(), Duration::from_secs(50));
  }
}
