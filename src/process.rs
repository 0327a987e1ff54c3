//! Subprocess execution with concurrent stream capture
//!
//! Both external tools (terraform, docker) are driven through this one
//! helper: spawn with piped streams, drain stdout and stderr on two
//! independently scheduled tasks, then join both after the process exits.
//! Draining concurrently is what prevents buffer-driven deadlock when a
//! child interleaves large output on both streams.
//!
//! There is no timeout and no retry here; a hung child blocks the calling
//! test until the surrounding test framework gives up.

use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Outcome of one subprocess or in-container execution
///
/// All three fields are always populated once the process terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Process exit code; -1 when the process was killed by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a command to completion, capturing both streams
pub async fn run_capture(mut command: Command) -> io::Result<ExecResult> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    let stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not piped"))?;
    let stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not piped"))?;

    let stdout_task = drain(stdout_pipe);
    let stderr_task = drain(stderr_pipe);

    let status = child.wait().await?;
    let stdout = stdout_task.await.map_err(io::Error::other)??;
    let stderr = stderr_task.await.map_err(io::Error::other)??;

    Ok(ExecResult {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

fn drain<R>(mut pipe: R) -> JoinHandle<io::Result<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = String::new();
        pipe.read_to_string(&mut buffer).await?;
        Ok(buffer)
    })
}
