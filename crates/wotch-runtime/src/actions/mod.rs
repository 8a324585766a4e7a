//! Action variants.

mod do_not_await;
mod parallel;
mod say;
mod sequence;
mod wait;

pub use do_not_await::DoNotAwait;
pub use parallel::Parallel;
pub use say::Say;
pub use sequence::Sequence;
pub use wait::Wait;
