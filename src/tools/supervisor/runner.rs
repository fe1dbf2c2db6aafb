use std::{process::ExitStatus, sync::Arc, time::Duration};

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::lib::errors::SupervisorError;

use super::{
    managed::{spawn_error, ManagedProcess, StopOutcome},
    plan::StackPlan,
    sink::OutputSink,
    state::{StateTracker, SupervisorState},
};

const INSTALL_LABEL: &str = "INSTALL";
const RELAY_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Why a run that started successfully came to an end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Shutdown was requested by a signal or by the caller.
    Interrupted,
    /// One of the children exited on its own.
    ChildExited { label: String, status: ExitStatus },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Interrupted => 0,
            RunOutcome::ChildExited { status, .. } if status.success() => 0,
            RunOutcome::ChildExited { .. } => 1,
        }
    }
}

/// Result of stopping one child during shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    pub label: String,
    pub outcome: StopOutcome,
}

/// Runs the server and client processes as one unit.
pub struct StackSupervisor {
    plan: StackPlan,
    sink: Arc<dyn OutputSink>,
    shutdown: CancellationToken,
    relay_stop: CancellationToken,
    force_stop: CancellationToken,
    state: StateTracker,
    server: Option<ManagedProcess>,
    client: Option<ManagedProcess>,
}

impl StackSupervisor {
    /// `shutdown` is cancelled by signal handlers or callers to stop the run.
    pub fn new(plan: StackPlan, sink: Arc<dyn OutputSink>, shutdown: CancellationToken) -> Self {
        Self {
            plan,
            sink,
            shutdown,
            relay_stop: CancellationToken::new(),
            force_stop: CancellationToken::new(),
            state: StateTracker::default(),
            server: None,
            client: None,
        }
    }

    /// Cancelling `force_stop` during shutdown kills children without waiting out the grace period.
    pub fn with_force_stop(mut self, force_stop: CancellationToken) -> Self {
        self.force_stop = force_stop;
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state.current()
    }

    pub fn history(&self) -> &[SupervisorState] {
        self.state.history()
    }

    /// Ask a running supervisor to shut down.
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Install, start both children, relay their output until shutdown, then stop them.
    pub async fn run(&mut self) -> Result<RunOutcome, SupervisorError> {
        let result = self.start_and_monitor().await;
        if let Err(err) = &result {
            warn!(
                target: "eventura_devkit::supervisor",
                error = %err,
                state = %self.state.current(),
                "Stack run failed; cleaning up"
            );
        }
        self.shutdown().await;
        result
    }

    async fn start_and_monitor(&mut self) -> Result<RunOutcome, SupervisorError> {
        self.advance(SupervisorState::Installing)?;
        if let Some(outcome) = self.install_dependencies().await? {
            return Ok(outcome);
        }

        self.advance(SupervisorState::StartingServer)?;
        if let Some(outcome) = self.start_server().await? {
            return Ok(outcome);
        }

        self.advance(SupervisorState::StartingClient)?;
        self.start_client()?;

        self.advance(SupervisorState::Running)?;
        self.sink.status("Full stack is running!");
        self.sink.status("Press Ctrl+C to stop all processes");
        self.monitor().await
    }

    async fn install_dependencies(&mut self) -> Result<Option<RunOutcome>, SupervisorError> {
        let Some(install) = self.plan.install.clone() else {
            self.sink.status("Skipping dependency installation");
            return Ok(None);
        };

        self.sink
            .status(&format!("Installing dependencies with `{install}`..."));
        let mut child = install
            .to_command(&self.plan.project_root, false)
            .spawn()
            .map_err(|source| spawn_error(INSTALL_LABEL, &install, source))?;

        let waited = tokio::select! {
            _ = self.shutdown.cancelled() => None,
            status = child.wait() => Some(status),
        };
        let Some(status) = waited else {
            if let Err(err) = child.kill().await {
                warn!(
                    target: "eventura_devkit::supervisor",
                    label = INSTALL_LABEL,
                    error = %err,
                    "Failed to stop interrupted install"
                );
            }
            return Ok(Some(RunOutcome::Interrupted));
        };

        let status = status.map_err(|source| SupervisorError::Wait {
            label: INSTALL_LABEL.to_string(),
            source,
        })?;
        if !status.success() {
            return Err(SupervisorError::InstallFailed {
                command: install.to_string(),
                exit_code: status.code(),
            });
        }

        self.sink.status("Dependencies installed successfully");
        Ok(None)
    }

    async fn start_server(&mut self) -> Result<Option<RunOutcome>, SupervisorError> {
        let label = self.plan.server_label.clone();
        self.sink.status(&format!("Starting {label} process..."));
        let process = ManagedProcess::spawn(
            &label,
            &self.plan.server,
            &self.plan.project_root,
            Arc::clone(&self.sink),
            self.relay_stop.clone(),
        )?;
        self.server = Some(process);

        let interrupted = tokio::select! {
            _ = self.shutdown.cancelled() => true,
            _ = time::sleep(self.plan.warmup) => false,
        };
        if interrupted {
            return Ok(Some(RunOutcome::Interrupted));
        }

        if let Some(server) = self.server.as_mut() {
            if let Some(status) = server.try_exit_status()? {
                return Err(SupervisorError::ServerStartFailed {
                    label,
                    exit_code: status.code(),
                });
            }
        }

        self.sink
            .status(&format!("{label} process started successfully"));
        Ok(None)
    }

    fn start_client(&mut self) -> Result<(), SupervisorError> {
        let label = self.plan.client_label.clone();
        self.sink.status(&format!("Starting {label} process..."));
        let process = ManagedProcess::spawn(
            &label,
            &self.plan.client,
            &self.plan.project_root,
            Arc::clone(&self.sink),
            self.relay_stop.clone(),
        )
        .map_err(|source| SupervisorError::ClientStartFailed {
            label: label.clone(),
            source: Box::new(source),
        })?;
        self.client = Some(process);
        self.sink
            .status(&format!("{label} process started successfully"));
        Ok(())
    }

    async fn monitor(&mut self) -> Result<RunOutcome, SupervisorError> {
        let mut ticker = time::interval(self.plan.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let cancelled = tokio::select! {
                _ = self.shutdown.cancelled() => true,
                _ = ticker.tick() => false,
            };
            if cancelled {
                return Ok(RunOutcome::Interrupted);
            }

            for process in [&mut self.server, &mut self.client].into_iter().flatten() {
                if let Some(status) = process.try_exit_status()? {
                    info!(
                        target: "eventura_devkit::supervisor",
                        label = %process.label(),
                        exit_code = ?status.code(),
                        "Child process exited"
                    );
                    return Ok(RunOutcome::ChildExited {
                        label: process.label().to_string(),
                        status,
                    });
                }
            }
        }
    }

    /// Stop every running child: terminate, wait up to the grace period, then kill.
    ///
    /// A no-op when no run is in progress: before `run`, or after a previous shutdown.
    pub async fn shutdown(&mut self) -> Vec<StopReport> {
        let has_children = self.server.is_some() || self.client.is_some();
        let idle = matches!(
            self.state.current(),
            SupervisorState::Idle | SupervisorState::Stopped
        );
        if idle && !has_children {
            return Vec::new();
        }
        self.state.advance(SupervisorState::Stopping);

        if has_children {
            self.sink.status("Stopping processes...");
        }

        let grace = self.plan.grace;
        let mut reports = Vec::new();
        for slot in [&mut self.server, &mut self.client] {
            let Some(process) = slot.as_mut() else {
                continue;
            };
            match process.terminate(grace, &self.force_stop).await {
                Ok(outcome) => reports.push(StopReport {
                    label: process.label().to_string(),
                    outcome,
                }),
                Err(err) => warn!(
                    target: "eventura_devkit::supervisor",
                    label = %process.label(),
                    error = %err,
                    "Failed to stop child process"
                ),
            }
        }

        self.relay_stop.cancel();
        for slot in [&mut self.server, &mut self.client] {
            if let Some(mut process) = slot.take() {
                process.join_relay(RELAY_JOIN_TIMEOUT).await;
            }
        }

        self.state.advance(SupervisorState::Stopped);
        if has_children {
            self.sink.status("All processes stopped");
        }
        reports
    }

    fn advance(&mut self, next: SupervisorState) -> Result<(), SupervisorError> {
        let from = self.state.current();
        if self.state.advance(next) {
            Ok(())
        } else {
            Err(SupervisorError::InvalidTransition {
                from: from.as_str(),
                to: next.as_str(),
            })
        }
    }
}
