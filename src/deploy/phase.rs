// ABOUTME: Phase bookkeeping for a deployment run.
// ABOUTME: Tracks per-phase results, cleanup status, and the overall report.

use std::fmt;

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Create the remote staging directory (idempotent).
    Workspace,
    /// Remove any binary left behind by a previous run.
    ClearStale,
    /// Copy the binary into the staging directory.
    Upload,
    /// Copy the optional local test-data directory.
    TestData,
    /// Run the verification script against the staged binary.
    Verify,
    /// Remove the staging directory. Always runs, never fatal.
    Cleanup,
}

impl Phase {
    /// Short machine-readable name, used in JSON events.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Workspace => "workspace",
            Phase::ClearStale => "clear-stale",
            Phase::Upload => "upload",
            Phase::TestData => "test-data",
            Phase::Verify => "verify",
            Phase::Cleanup => "cleanup",
        }
    }

    /// Human-readable description, used in progress markers.
    pub fn describe(&self) -> &'static str {
        match self {
            Phase::Workspace => "prepare staging directory",
            Phase::ClearStale => "remove stale binary",
            Phase::Upload => "upload binary",
            Phase::TestData => "upload test data",
            Phase::Verify => "run verification script",
            Phase::Cleanup => "remove staging directory",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Outcome of one executed phase.
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: Phase,
    pub success: bool,
    /// Captured combined output on success, the failure detail otherwise.
    pub detail: String,
}

/// Outcome of the cleanup phase, kept separate from the fatal error type:
/// a failure here is reported but never escalated to the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStatus {
    Removed,
    Failed(String),
}

impl CleanupStatus {
    pub fn succeeded(&self) -> bool {
        matches!(self, CleanupStatus::Removed)
    }
}

/// Full report of a deployment run.
#[derive(Debug)]
pub struct RunReport {
    /// Mandatory phases in execution order, up to and including the first
    /// failure.
    pub phases: Vec<PhaseReport>,
    pub cleanup: CleanupStatus,
}

impl RunReport {
    /// Overall success: every mandatory phase that ran succeeded.
    /// Cleanup does not participate in the verdict.
    pub fn success(&self) -> bool {
        !self.phases.is_empty() && self.phases.iter().all(|p| p.success)
    }
}
