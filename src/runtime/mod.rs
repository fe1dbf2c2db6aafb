//! Process-level plumbing shared by the binaries: exit reporting and signal handling.
mod exit;
mod signals;

pub use exit::RuntimeExit;
pub use signals::cancel_on_signal;
