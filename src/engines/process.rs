use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Captured output of a completed engine subprocess
#[derive(Debug)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run an engine subprocess with a bounded wait.
///
/// Exit is polled on a fixed interval; when the wait cap is exceeded the
/// child is killed and the job fails with `CollaboratorTimeout`. A missing
/// binary surfaces as `CollaboratorUnavailable`, a non-zero exit as
/// `CollaboratorFailed` carrying the captured stderr.
pub async fn run_engine(
    engine: &'static str,
    mut command: Command,
    timeout: Duration,
    poll_interval: Duration,
) -> PipelineResult<EngineOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Spawning {} engine: {:?}", engine, command.as_std());

    let mut child = command.spawn().map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            PipelineError::CollaboratorUnavailable {
                engine,
                reason: "binary not found on PATH".to_string(),
            }
        } else {
            PipelineError::Io(err)
        }
    })?;

    // Drain the pipes concurrently so a chatty engine cannot block on a
    // full pipe buffer while we poll for exit.
    let stdout_pipe = child.stdout.take();
    let stdout_task = tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(mut pipe) = stdout_pipe {
            let _ = pipe.read_to_string(&mut buf).await;
        }
        buf
    });
    let stderr_pipe = child.stderr.take();
    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(mut pipe) = stderr_pipe {
            let _ = pipe.read_to_string(&mut buf).await;
        }
        buf
    });

    let started = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if started.elapsed() >= timeout {
                    let _ = child.start_kill();
                    return Err(PipelineError::CollaboratorTimeout {
                        engine,
                        waited_secs: started.elapsed().as_secs(),
                    });
                }
                tokio::time::sleep(poll_interval).await;
            }
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    if !status.success() {
        let detail = if stderr.trim().is_empty() {
            format!("exit status {status}")
        } else {
            stderr.trim().to_string()
        };
        return Err(PipelineError::CollaboratorFailed { engine, detail });
    }

    Ok(EngineOutput { stdout, stderr })
}
