//! Full-stack supervisor: runs the backend server and the client build side by side.
mod managed;
mod plan;
mod runner;
mod sink;
mod state;

pub use managed::{ManagedProcess, StopOutcome};
pub use plan::{ClientDefaults, StackPlan};
pub use runner::{RunOutcome, StackSupervisor, StopReport};
pub use sink::{format_line, CollectingSink, OutputSink, StdoutSink};
pub use state::{StateTracker, SupervisorState};
