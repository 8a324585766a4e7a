//! Workout script parser for wotch.
//!
//! Compiles indentation-structured workout text into the action trees
//! executed by `wotch-runtime`. A parse either yields a complete tree or a
//! single [`ParseError`] pointing at the offending line and column.
//!
//! # Format
//!
//! ```text
//! # Week 1 - Mon                  program
//!
//! ## Squats                       exercise
//! * 3 sets x 10 reps
//! * before:                       matcher
//!   * say 'get ready'             actions, one level deeper
//!   * prepare for 10s
//! * during rep:
//!   * wait for 2s
//! * after set 1..2:
//!   * break for 1m 30s
//! * after last set:
//!   * don't wait:
//!     * say 'done'
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use wotch_host::Capabilities;
//! use wotch_parser::WorkoutParser;
//! use wotch_runtime::RuntimeConfig;
//!
//! let parser = WorkoutParser::new(Capabilities::system(), RuntimeConfig::default());
//! let workout = parser.parse_workout(&text)?;
//! let program = workout.program("week 1 - mon");
//! ```

mod composite;
mod duration;
mod error;
mod matcher;
mod parser;
mod source;

pub use duration::parse_duration;
pub use error::ParseError;
pub use parser::WorkoutParser;
