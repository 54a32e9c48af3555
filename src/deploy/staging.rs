// ABOUTME: Scoped guard for the remote staging directory.
// ABOUTME: Prepare acquires it, release always tears it down without escalating.

use super::error::DeployError;
use super::phase::{CleanupStatus, Phase};
use crate::ssh::{CommandOutput, CommandRunner, RemoteSession};

/// Fixed remote scratch directory for staged artifacts. Created per run
/// and destroyed at run end. Concurrent runs against one host race on
/// this path; that is an accepted limitation.
pub const STAGING_DIR: &str = "/tmp/mujina-test";

/// Remote filename of the staged binary.
pub const BINARY_NAME: &str = "minerd";

/// The remote staging directory as a scoped resource.
///
/// `prepare` creates it; `release` removes it recursively and must run
/// on every exit path out of a deployment, including phase failures.
/// Release failure is downgraded to [`CleanupStatus::Failed`] so it can
/// never become the run's exit status.
pub struct StagingDir<'a> {
    runner: &'a dyn CommandRunner,
    session: &'a RemoteSession,
}

impl<'a> StagingDir<'a> {
    pub fn new(runner: &'a dyn CommandRunner, session: &'a RemoteSession) -> Self {
        Self { runner, session }
    }

    /// Remote path of the staged binary.
    pub fn binary_path() -> String {
        format!("{STAGING_DIR}/{BINARY_NAME}")
    }

    /// Create the staging directory, tolerating prior existence.
    pub async fn prepare(&self) -> Result<CommandOutput, DeployError> {
        let invocation = self.session.shell(&format!("mkdir -p {STAGING_DIR}"));
        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(DeployError::from_output(Phase::Workspace, &output)),
            Err(e) => Err(DeployError::from_transport(Phase::Workspace, e)),
        }
    }

    /// Remove the staging directory and everything staged under it.
    pub async fn release(self) -> CleanupStatus {
        let invocation = self.session.shell(&format!("rm -rf {STAGING_DIR}"));
        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => CleanupStatus::Removed,
            Ok(output) => CleanupStatus::Failed(format!(
                "exit code {}: {}",
                output.exit_code,
                output.stderr.trim()
            )),
            Err(e) => CleanupStatus::Failed(e.to_string()),
        }
    }
}
