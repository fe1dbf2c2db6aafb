use std::fmt;

use tracing::debug;

/// Lifecycle of a stack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Installing,
    StartingServer,
    StartingClient,
    Running,
    Stopping,
    Stopped,
}

impl SupervisorState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Installing => "installing",
            SupervisorState::StartingServer => "starting-server",
            SupervisorState::StartingClient => "starting-client",
            SupervisorState::Running => "running",
            SupervisorState::Stopping => "stopping",
            SupervisorState::Stopped => "stopped",
        }
    }

    /// Whether `next` may follow `self`.
    pub fn can_transition_to(&self, next: SupervisorState) -> bool {
        use SupervisorState::*;
        matches!(
            (self, next),
            (Idle, Installing)
                | (Installing, StartingServer)
                | (StartingServer, StartingClient)
                | (StartingClient, Running)
                | (Idle | Installing | StartingServer | StartingClient | Running, Stopping)
                | (Stopping, Stopped)
        )
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state plus every state visited so far.
#[derive(Debug, Clone)]
pub struct StateTracker {
    history: Vec<SupervisorState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            history: vec![SupervisorState::Idle],
        }
    }
}

impl StateTracker {
    pub fn current(&self) -> SupervisorState {
        self.history
            .last()
            .copied()
            .unwrap_or(SupervisorState::Idle)
    }

    pub fn history(&self) -> &[SupervisorState] {
        &self.history
    }

    /// Move to `next`; illegal transitions are ignored and return false.
    pub fn advance(&mut self, next: SupervisorState) -> bool {
        let current = self.current();
        if !current.can_transition_to(next) {
            debug!(
                target: "eventura_devkit::supervisor",
                from = %current,
                to = %next,
                "Ignoring invalid state transition"
            );
            return false;
        }
        debug!(
            target: "eventura_devkit::supervisor",
            from = %current,
            to = %next,
            "State transition"
        );
        self.history.push(next);
        true
    }
}
