//! Docker bridge for ephemeral script execution
//!
//! Containers started here are detached, auto-removing, host-networked,
//! and labeled so stray ones can be found and cleaned up by hand:
//!
//! ```text
//! docker ps --filter label=tfcheck=true
//! ```
//!
//! The bridge holds no lifecycle state beyond the id string the runtime
//! prints; a container lives until it self-terminates or [`remove`] is
//! called.
//!
//! [`remove`]: ContainerBridge::remove

use std::env;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::process::{run_capture, ExecResult};

/// Environment variable overriding the container runtime binary
pub const BINARY_ENV: &str = "TFCHECK_DOCKER";

/// Label attached to every container the harness starts
pub const HARNESS_LABEL: &str = "tfcheck=true";

const DEFAULT_BINARY: &str = "docker";

/// Starts containers and executes commands inside them
#[derive(Debug, Clone)]
pub struct ContainerBridge {
    binary: String,
}

impl Default for ContainerBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBridge {
    /// Bridge using the ambient `TFCHECK_DOCKER` binary, or `docker`
    pub fn new() -> Self {
        Self {
            binary: env::var(BINARY_ENV).unwrap_or_else(|_| DEFAULT_BINARY.to_string()),
        }
    }

    /// Bridge pinned to a specific binary; lets tests substitute a fake
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Start a detached container from `image` running `init_command`
    /// through a shell entry point, and return its trimmed id
    pub async fn run(&self, image: &str, init_command: &str) -> Result<String> {
        log::debug!("starting container from {image}");

        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "run",
            "--rm",
            "--detach",
            "--label",
            HARNESS_LABEL,
            "--network",
            "host",
            "--entrypoint",
            "sh",
        ])
        .arg(image)
        .args(["-c", init_command]);

        let output = run_capture(cmd).await?;
        if !output.success() {
            return Err(Error::ContainerStart {
                stdout: output.stdout,
            });
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Execute a command inside a running container
    ///
    /// Returns the captured streams and exit code regardless of whether
    /// the command succeeded; failure classification is the caller's call.
    pub async fn exec(&self, container_id: &str, command: &[&str]) -> Result<ExecResult> {
        log::debug!("exec in {container_id}: {command:?}");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("exec").arg(container_id).args(command);
        Ok(run_capture(cmd).await?)
    }

    /// Best-effort forced removal for tests that want eager cleanup
    /// instead of waiting for the container to self-terminate
    pub async fn remove(&self, container_id: &str) {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["rm", "--force"]).arg(container_id);
        match run_capture(cmd).await {
            Ok(output) if output.success() => {}
            Ok(output) => log::warn!("failed to remove {container_id}: {}", output.stderr.trim()),
            Err(err) => log::warn!("failed to remove {container_id}: {err}"),
        }
    }
}
