use std::{path::Path, process::ExitStatus, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Child,
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::lib::{errors::SupervisorError, process::CommandSpec, process::request_termination};

use super::sink::OutputSink;

/// How a child ended up stopped during shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The child had already exited before shutdown reached it.
    AlreadyExited(ExitStatus),
    /// The child exited within the grace period after a termination request.
    Terminated(ExitStatus),
    /// The child outlived the grace period and was killed.
    Killed,
}

/// A child process owned by the supervisor, with its output relay.
pub struct ManagedProcess {
    label: String,
    child: Child,
    relay: Option<JoinHandle<()>>,
    exit_status: Option<ExitStatus>,
}

impl ManagedProcess {
    /// Spawn `command` in `cwd` and start relaying its stdout and stderr to `sink`.
    pub fn spawn(
        label: &str,
        command: &CommandSpec,
        cwd: &Path,
        sink: Arc<dyn OutputSink>,
        stop: CancellationToken,
    ) -> Result<Self, SupervisorError> {
        let mut child = command
            .to_command(cwd, true)
            .spawn()
            .map_err(|source| spawn_error(label, command, source))?;

        info!(
            target: "eventura_devkit::supervisor",
            label,
            pid = child.id().unwrap_or_default(),
            command = %command,
            cwd = %cwd.display(),
            "Spawned child process"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let relay_label = label.to_string();
        let relay = tokio::spawn(async move {
            tokio::join!(
                drain_lines(&relay_label, stdout, sink.as_ref(), &stop),
                drain_lines(&relay_label, stderr, sink.as_ref(), &stop),
            );
        });

        Ok(Self {
            label: label.to_string(),
            child,
            relay: Some(relay),
            exit_status: None,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Exit status if the child has exited, without blocking.
    pub fn try_exit_status(&mut self) -> Result<Option<ExitStatus>, SupervisorError> {
        if self.exit_status.is_none() {
            self.exit_status = self
                .child
                .try_wait()
                .map_err(|source| SupervisorError::Wait {
                    label: self.label.clone(),
                    source,
                })?;
        }
        Ok(self.exit_status)
    }

    /// Request graceful termination, then kill if the child outlives `grace`
    /// or `force` is cancelled first.
    pub async fn terminate(
        &mut self,
        grace: Duration,
        force: &CancellationToken,
    ) -> Result<StopOutcome, SupervisorError> {
        if let Some(status) = self.try_exit_status()? {
            return Ok(StopOutcome::AlreadyExited(status));
        }

        let requested = match self.child.id() {
            Some(pid) => match request_termination(pid) {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        target: "eventura_devkit::supervisor",
                        label = %self.label,
                        pid,
                        error = %err,
                        "Graceful termination request failed; killing"
                    );
                    false
                }
            },
            None => false,
        };

        if requested {
            let waited = tokio::select! {
                waited = time::timeout(grace, self.child.wait()) => Some(waited),
                _ = force.cancelled() => None,
            };
            match waited {
                Some(Ok(Ok(status))) => {
                    self.exit_status = Some(status);
                    debug!(
                        target: "eventura_devkit::supervisor",
                        label = %self.label,
                        exit_code = ?status.code(),
                        "Child exited after termination request"
                    );
                    return Ok(StopOutcome::Terminated(status));
                }
                Some(Ok(Err(source))) => {
                    return Err(SupervisorError::Wait {
                        label: self.label.clone(),
                        source,
                    })
                }
                Some(Err(_)) => {
                    warn!(
                        target: "eventura_devkit::supervisor",
                        label = %self.label,
                        grace_ms = grace.as_millis(),
                        "Child did not exit within grace period; killing"
                    );
                }
                None => {
                    warn!(
                        target: "eventura_devkit::supervisor",
                        label = %self.label,
                        "Forced stop requested; killing"
                    );
                }
            }
        }

        self.child
            .kill()
            .await
            .map_err(|source| SupervisorError::Wait {
                label: self.label.clone(),
                source,
            })?;
        Ok(StopOutcome::Killed)
    }

    /// Wait for the output relay to finish, giving up after `limit`.
    pub async fn join_relay(&mut self, limit: Duration) {
        let Some(relay) = self.relay.take() else {
            return;
        };
        if time::timeout(limit, relay).await.is_err() {
            debug!(
                target: "eventura_devkit::supervisor",
                label = %self.label,
                "Output relay did not finish in time"
            );
        }
    }
}

/// Map a spawn failure, keeping "program not found" distinct.
pub fn spawn_error(label: &str, command: &CommandSpec, source: std::io::Error) -> SupervisorError {
    if source.kind() == std::io::ErrorKind::NotFound {
        SupervisorError::ToolNotFound {
            tool: command.program.clone(),
        }
    } else {
        SupervisorError::Spawn {
            label: label.to_string(),
            command: command.to_string(),
            source,
        }
    }
}

async fn drain_lines<R>(
    label: &str,
    stream: Option<R>,
    sink: &dyn OutputSink,
    stop: &CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return;
    };
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        // Pending output wins over the stop request.
        let read = tokio::select! {
            biased;
            read = reader.read_until(b'\n', &mut buf) => read,
            _ = stop.cancelled() => break,
        };
        match read {
            Ok(0) => break,
            Ok(_) => sink.emit(label, &decode_line(&buf)),
            Err(err) => {
                debug!(
                    target: "eventura_devkit::supervisor",
                    label,
                    error = %err,
                    "Stopped relaying output"
                );
                break;
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end().to_string()
}
