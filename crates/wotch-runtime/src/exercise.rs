//! Exercises.
//!
//! An exercise walks a fixed timeline of [`Event`]s (see [`timeline`]) and,
//! at each point, runs every action whose matcher fires, in registration
//! order.
//!
//! Skip-ahead is all-or-nothing per action: a timed action the remaining
//! budget fully covers is skipped without side effects, anything else runs
//! in full (spending whatever budget is left on its own prefix). Zero-length
//! actions always run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use wotch_host::SpeechService;

use crate::action::{Action, ActionRef, execute_or_skip};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::event::{Event, timeline};
use crate::matcher::MatcherWithAction;

pub struct Exercise {
  speech: Arc<dyn SpeechService>,
  name: String,
  set_count: u32,
  repetition_count: u32,
  matchers: Vec<MatcherWithAction>,
}

impl std::fmt::Debug for Exercise {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Exercise")
      .field("name", &self.name)
      .field("set_count", &self.set_count)
      .field("repetition_count", &self.repetition_count)
      .finish_non_exhaustive()
  }
}

impl Exercise {
  /// Create an exercise.
  ///
  /// # Errors
  /// Returns an error if `name` is blank.
  pub fn new(
    speech: Arc<dyn SpeechService>,
    name: impl Into<String>,
    set_count: u32,
    repetition_count: u32,
    matchers: Vec<MatcherWithAction>,
  ) -> Result<Self, RuntimeError> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(RuntimeError::invalid_action("exercise name must not be blank"));
    }

    Ok(Self {
      speech,
      name,
      set_count,
      repetition_count,
      matchers,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn set_count(&self) -> u32 {
    self.set_count
  }

  pub fn repetition_count(&self) -> u32 {
    self.repetition_count
  }

  pub fn matchers(&self) -> &[MatcherWithAction] {
    &self.matchers
  }

  /// Actions bound to `event`, in registration order.
  pub fn actions_for<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a ActionRef> + 'a {
    self
      .matchers
      .iter()
      .filter(move |binding| binding.matcher.matches(event))
      .map(|binding| &binding.action)
  }

  fn timeline(&self) -> Vec<Event> {
    timeline(self.set_count, self.repetition_count)
  }
}

#[async_trait]
impl Action for Exercise {
  fn duration(&self) -> Duration {
    self
      .timeline()
      .iter()
      .map(|event| {
        self
          .actions_for(event)
          .map(|action| action.duration())
          .sum::<Duration>()
      })
      .sum()
  }

  #[instrument(
    name = "exercise_execute",
    skip(self, context),
    fields(exercise = %self.name, sets = self.set_count, repetitions = self.repetition_count)
  )]
  async fn execute(&self, context: &ExecutionContext) -> Result<(), RuntimeError> {
    context.check_cancelled()?;
    info!(progress = ?context.progress(), "exercise_started");

    context.set_current_exercise(&self.name);
    self
      .speech
      .speak(&self.name, context.cancellation())
      .await?;

    for event in self.timeline() {
      match event {
        Event::BeforeSet { set } => context.set_current_set(set),
        Event::BeforeRepetition { repetition, .. } => context.set_current_repetition(repetition),
        _ => {}
      }

      for action in self.actions_for(&event) {
        if !execute_or_skip(action.as_ref(), context).await? {
          debug!(event = ?event, duration = ?action.duration(), "action_skipped");
        }
      }
    }

    info!(progress = ?context.progress(), "exercise_completed");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::ContextChange;
  use crate::event::EventKind;
  use crate::matcher::TypedEventMatcher;
  use crate::testing::{Behavior, MockAction, RecordingSpeechService};

  fn on(kind: EventKind, action: ActionRef) -> MatcherWithAction {
    MatcherWithAction::new(Arc::new(TypedEventMatcher::new(kind)), action)
  }

  fn exercise(sets: u32, reps: u32, matchers: Vec<MatcherWithAction>) -> Exercise {
    let speech = Arc::new(RecordingSpeechService::default());
    Exercise::new(speech, "Push-ups", sets, reps, matchers).unwrap()
  }

  fn shape_fixture() -> (Exercise, [Arc<MockAction>; 3]) {
    let before = MockAction::new(Duration::from_secs(10));
    let during = MockAction::new(Duration::from_secs(3));
    let after_set = MockAction::new(Duration::from_secs(1));
    let sut = exercise(
      2,
      3,
      vec![
        on(EventKind::BeforeExercise, before.clone()),
        on(EventKind::DuringRepetition, during.clone()),
        on(EventKind::AfterSet, after_set.clone()),
      ],
    );
    (sut, [before, during, after_set])
  }

  #[test]
  fn test_blank_name_rejected() {
    let speech = Arc::new(RecordingSpeechService::default());
    let result = Exercise::new(speech, "  ", 3, 10, vec![]);
    assert!(matches!(result, Err(RuntimeError::InvalidAction { .. })));
  }

  #[test]
  fn test_accessors() {
    let speech = Arc::new(RecordingSpeechService::default());
    let name = "An exercise name with !@*&(*$#&^$).,/.<?][:[]; weird characters";
    let sut = Exercise::new(speech, name, 3, 10, vec![]).unwrap();
    assert_eq!(sut.name(), name);
    assert_eq!(sut.set_count(), 3);
    assert_eq!(sut.repetition_count(), 10);
  }

  #[test]
  fn test_duration_is_zero_without_actions() {
    assert_eq!(exercise(3, 10, vec![]).duration(), Duration::ZERO);
  }

  #[test]
  fn test_duration_sums_matched_actions_over_timeline() {
    let (sut, _) = shape_fixture();
    // 10s + 2 sets * 3 reps * 3s + 2 sets * 1s
    assert_eq!(sut.duration(), Duration::from_secs(30));
  }

  #[tokio::test]
  async fn test_executes_matched_actions_per_event() {
    let (sut, [before, during, after_set]) = shape_fixture();

    sut.execute(&ExecutionContext::new()).await.unwrap();

    assert_eq!(before.executions(), 1);
    assert_eq!(during.executions(), 6);
    assert_eq!(after_set.executions(), 2);
  }

  #[tokio::test]
  async fn test_zero_duration_actions_run_despite_skip_ahead() {
    let announcement = MockAction::new(Duration::ZERO);
    let sut = exercise(4, 8, vec![on(EventKind::BeforeExercise, announcement.clone())]);

    sut
      .execute(&ExecutionContext::with_skip_ahead(Duration::from_secs(3600)))
      .await
      .unwrap();

    assert_eq!(announcement.executions(), 1);
  }

  #[tokio::test]
  async fn test_skips_actions_covered_by_skip_ahead() {
    for paused in [false, true] {
      let first = MockAction::with_behavior(Duration::from_secs(10), Behavior::Fail);
      let second = MockAction::with_behavior(Duration::from_secs(3), Behavior::Fail);
      let third = MockAction::new(Duration::from_secs(1));
      let sut = exercise(
        1,
        1,
        vec![
          on(EventKind::BeforeExercise, first.clone()),
          on(EventKind::BeforeExercise, second.clone()),
          on(EventKind::BeforeExercise, third.clone()),
        ],
      );
      let context = ExecutionContext::with_skip_ahead(Duration::from_secs(13));
      context.set_paused(paused);

      sut.execute(&context).await.unwrap();

      assert_eq!(first.executions(), 0);
      assert_eq!(second.executions(), 0);
      assert_eq!(third.executions(), 1);
      assert_eq!(context.progress(), Duration::from_secs(13));
    }
  }

  #[tokio::test]
  async fn test_skip_ahead_across_repetitions() {
    let (sut, [before, during, after_set]) = shape_fixture();
    let context = ExecutionContext::with_skip_ahead(Duration::from_secs(13));

    sut.execute(&context).await.unwrap();

    assert_eq!(before.executions(), 0);
    assert_eq!(during.executions(), 5);
    assert_eq!(after_set.executions(), 2);
  }

  #[tokio::test]
  async fn test_partially_covered_action_executes() {
    let action = MockAction::new(Duration::from_secs(10));
    let sut = exercise(1, 1, vec![on(EventKind::AfterExercise, action.clone())]);
    let context = ExecutionContext::with_skip_ahead(Duration::from_secs(9));

    sut.execute(&context).await.unwrap();

    assert_eq!(action.executions(), 1);
    // The budget is left for the action itself to spend.
    assert_eq!(context.skip_ahead_remaining(), Duration::from_secs(9));
  }

  #[tokio::test]
  async fn test_updates_current_exercise() {
    let sut = exercise(1, 1, vec![]);
    let context = ExecutionContext::new();

    sut.execute(&context).await.unwrap();

    assert_eq!(context.current_exercise().as_deref(), Some("Push-ups"));
  }

  #[tokio::test]
  async fn test_publishes_sets_and_repetitions_in_order() {
    let sut = exercise(3, 5, vec![]);
    let context = ExecutionContext::new();
    let mut changes = context.subscribe();

    sut.execute(&context).await.unwrap();

    let mut sets = Vec::new();
    let mut repetitions = Vec::new();
    while let Ok(change) = changes.try_recv() {
      match change {
        ContextChange::CurrentSet(set) => sets.push(set),
        ContextChange::CurrentRepetition(repetition) => repetitions.push(repetition),
        _ => {}
      }
    }

    assert_eq!(sets, vec![1, 2, 3]);
    assert_eq!(repetitions.len(), 15);
    assert_eq!(&repetitions[..5], &[1, 2, 3, 4, 5]);
  }

  #[tokio::test]
  async fn test_says_name_first() {
    let speech = Arc::new(RecordingSpeechService::default());
    let sut = Exercise::new(speech.clone(), "some name", 1, 1, vec![]).unwrap();

    sut.execute(&ExecutionContext::new()).await.unwrap();

    assert_eq!(speech.spoken(), vec!["some name".to_string()]);
  }

  #[tokio::test]
  async fn test_failure_aborts_remaining_timeline() {
    let failing = MockAction::with_behavior(Duration::ZERO, Behavior::Fail);
    let after = MockAction::new(Duration::ZERO);
    let sut = exercise(
      2,
      2,
      vec![
        on(EventKind::BeforeSet, failing.clone()),
        on(EventKind::AfterExercise, after.clone()),
      ],
    );

    let result = sut.execute(&ExecutionContext::new()).await;

    assert!(matches!(result, Err(RuntimeError::Fault { .. })));
    assert_eq!(failing.executions(), 1);
    assert_eq!(after.executions(), 0);
  }
}
