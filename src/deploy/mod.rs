// ABOUTME: Deployment pipeline: staging, upload, verification, cleanup.
// ABOUTME: Exports the orchestrator, phase reports, and error types.

mod deployment;
mod error;
mod phase;
mod staging;
mod verify;

pub use deployment::{Deployment, TEST_DATA_DIR};
pub use error::DeployError;
pub use phase::{CleanupStatus, Phase, PhaseReport, RunReport};
pub use staging::{BINARY_NAME, STAGING_DIR, StagingDir};
pub use verify::{HELP_TIMEOUT_SECS, render_script};
