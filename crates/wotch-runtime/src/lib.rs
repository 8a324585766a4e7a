//! Workout runtime for wotch.
//!
//! This crate provides the action tree a workout compiles to and the
//! run-scoped context it executes against.
//!
//! # Architecture
//!
//! ```text
//! WorkoutRuntime
//! ├── new(action) - owns the root of an action tree
//! ├── duration() - nominal duration of the tree
//! └── execute(context) -> WorkoutExecution
//!
//! WorkoutExecution
//! └── wait() - runs the tree, returns an ExecutionSummary
//!
//! Action (Wait, Say, Sequence, Parallel, DoNotAwait, Exercise, Program)
//! ├── duration() - nominal time, skip-ahead and pauses excluded
//! └── execute(context)
//!
//! ExecutionContext
//! ├── skip-ahead budget + progress (one ledger)
//! ├── pause / resume / cancel
//! └── subscribe() -> ContextChange stream
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use wotch_runtime::{ExecutionContext, WorkoutRuntime};
//!
//! let runtime = WorkoutRuntime::new(program);
//! let context = ExecutionContext::with_skip_ahead(Duration::from_secs(90));
//! let mut changes = context.subscribe();
//!
//! let summary = runtime.execute(context).wait().await?;
//! ```

mod action;
pub mod actions;
mod config;
mod context;
mod error;
mod event;
mod execution;
mod exercise;
mod matcher;
mod program;
mod runtime;

#[cfg(test)]
mod testing;

pub use action::{Action, ActionRef};
pub use config::{DEFAULT_TICK_INTERVAL, RuntimeConfig};
pub use context::{ContextChange, ExecutionContext};
pub use error::RuntimeError;
pub use event::{Event, EventKind, timeline};
pub use execution::{ExecutionSummary, WorkoutExecution};
pub use exercise::Exercise;
pub use matcher::{EventMatcher, MatcherWithAction, NumberFilter, NumberedEventMatcher, TypedEventMatcher};
pub use program::{Program, Workout};
pub use runtime::{WorkoutRuntime, execute};
