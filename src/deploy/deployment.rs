// ABOUTME: Deployment orchestration: staged upload, verification, cleanup.
// ABOUTME: Phases run strictly in order; cleanup runs on every exit path.

use std::path::Path;

use super::error::DeployError;
use super::phase::{CleanupStatus, Phase, PhaseReport, RunReport};
use super::staging::{BINARY_NAME, STAGING_DIR, StagingDir};
use super::verify;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::ssh::{CommandOutput, CommandRunner, Invocation, RemoteSession};

/// Fixed relative path of the optional auxiliary test-data directory,
/// uploaded verbatim when present.
pub const TEST_DATA_DIR: &str = "test-data";

/// A single deployment run against one target host.
///
/// Strictly sequential: every remote invocation blocks until it finishes
/// or hits the connection timeout, and nothing is retried.
pub struct Deployment<'a> {
    session: &'a RemoteSession,
    runner: &'a dyn CommandRunner,
    output: &'a Output,
}

impl<'a> Deployment<'a> {
    pub fn new(
        session: &'a RemoteSession,
        runner: &'a dyn CommandRunner,
        output: &'a Output,
    ) -> Self {
        Self {
            session,
            runner,
            output,
        }
    }

    /// Run the full pipeline.
    ///
    /// The first mandatory-phase failure aborts the remaining mandatory
    /// phases; the staging directory is released on every exit path, and
    /// a release failure is recorded on the report and as a warning, not
    /// as the run's outcome.
    pub async fn run(&self, binary: &Path, test_data: &Path, diag: &mut Diagnostics) -> RunReport {
        let mut phases = Vec::new();
        let staging = StagingDir::new(self.runner, self.session);

        if let Err(e) = self
            .run_phases(&staging, binary, test_data, &mut phases)
            .await
        {
            tracing::debug!(phase = e.phase().name(), "aborting remaining phases");
        }

        self.output.phase_start(Phase::Cleanup);
        let cleanup = staging.release().await;
        match &cleanup {
            CleanupStatus::Removed => self.output.phase_success(Phase::Cleanup),
            CleanupStatus::Failed(detail) => {
                diag.warn(Warning::cleanup(format!(
                    "failed to remove {STAGING_DIR}: {detail}"
                )));
            }
        }

        RunReport { phases, cleanup }
    }

    async fn run_phases(
        &self,
        staging: &StagingDir<'_>,
        binary: &Path,
        test_data: &Path,
        phases: &mut Vec<PhaseReport>,
    ) -> Result<(), DeployError> {
        self.output.phase_start(Phase::Workspace);
        self.record(phases, Phase::Workspace, staging.prepare().await)?;

        let clear = self
            .session
            .shell(&format!("rm -f {}", StagingDir::binary_path()));
        self.exec_phase(phases, Phase::ClearStale, &clear).await?;

        let upload = self.session.copy(
            &binary.display().to_string(),
            &self.session.remote_path(&StagingDir::binary_path()),
            false,
        );
        self.exec_phase(phases, Phase::Upload, &upload).await?;

        if test_data.is_dir() {
            let copy = self.session.copy(
                &test_data.display().to_string(),
                &self.session.remote_path(STAGING_DIR),
                true,
            );
            self.exec_phase(phases, Phase::TestData, &copy).await?;
        } else {
            tracing::debug!(
                dir = %test_data.display(),
                "no test data directory, skipping upload"
            );
        }

        let script = verify::render_script(STAGING_DIR, BINARY_NAME, verify::HELP_TIMEOUT_SECS);
        let invocation = self.session.shell(&script);
        let transcript = self.exec_phase(phases, Phase::Verify, &invocation).await?;
        self.output.transcript(&transcript.stdout);

        Ok(())
    }

    /// Run one remote invocation as a mandatory phase: start marker,
    /// execution, result marker, report entry.
    async fn exec_phase(
        &self,
        phases: &mut Vec<PhaseReport>,
        phase: Phase,
        invocation: &Invocation,
    ) -> Result<CommandOutput, DeployError> {
        self.output.phase_start(phase);
        let result = match self.runner.run(invocation).await {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(DeployError::from_output(phase, &output)),
            Err(e) => Err(DeployError::from_transport(phase, e)),
        };
        self.record(phases, phase, result)
    }

    fn record(
        &self,
        phases: &mut Vec<PhaseReport>,
        phase: Phase,
        result: Result<CommandOutput, DeployError>,
    ) -> Result<CommandOutput, DeployError> {
        match result {
            Ok(output) => {
                phases.push(PhaseReport {
                    phase,
                    success: true,
                    detail: combined(&output),
                });
                self.output.phase_success(phase);
                Ok(output)
            }
            Err(e) => {
                phases.push(PhaseReport {
                    phase,
                    success: false,
                    detail: e.to_string(),
                });
                self.output.phase_failure(phase, &e.to_string());
                Err(e)
            }
        }
    }
}

fn combined(output: &CommandOutput) -> String {
    let mut text = output.stdout.trim_end().to_string();
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(stderr);
    }
    text
}
