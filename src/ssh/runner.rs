// ABOUTME: Child-process execution of ssh/scp invocations.
// ABOUTME: Defines the CommandRunner seam so tests can substitute a mock transport.

use super::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A fully specified child-process invocation: the program, its argument
/// vector, the environment entries added for this call only, and the
/// wall-clock bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub timeout: Duration,
}

/// Captured output of a finished invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes invocations. The deployment pipeline only sees this trait;
/// the real implementation spawns the external transport binaries.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Spawns invocations as child processes.
///
/// Environment entries are passed to each spawn call; the armtest
/// process's own environment is never mutated. A timed-out child is
/// killed when its future is dropped.
#[derive(Debug, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        tracing::debug!(
            program = invocation.program,
            args = ?invocation.args,
            "spawning transport process"
        );

        let mut command = Command::new(invocation.program);
        command
            .args(&invocation.args)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| Error::Spawn {
            program: invocation.program.to_string(),
            source: e,
        })?;

        let output = tokio::time::timeout(invocation.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::Timeout(invocation.timeout))?
            .map_err(|e| Error::Spawn {
                program: invocation.program.to_string(),
                source: e,
            })?;

        Ok(CommandOutput {
            // None means the child died from a signal
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
