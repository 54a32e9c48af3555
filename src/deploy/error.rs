// ABOUTME: Error types for mandatory deployment phases.
// ABOUTME: Distinguishes remote command failure, timeout, and transport spawn errors.

use super::phase::Phase;
use crate::ssh::{self, CommandOutput};
use std::time::Duration;
use thiserror::Error;

/// A mandatory phase failed. Any of these aborts the remaining mandatory
/// phases; cleanup still runs.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The remote invocation ran and returned non-zero.
    #[error("{phase} failed with exit code {exit_code}: {detail}")]
    PhaseFailed {
        phase: Phase,
        exit_code: i32,
        detail: String,
    },

    /// The invocation exceeded the connection timeout.
    #[error("{phase} timed out after {timeout:?}")]
    PhaseTimedOut { phase: Phase, timeout: Duration },

    /// The transport binary could not be spawned at all.
    #[error("{phase}: {source}")]
    Transport { phase: Phase, source: ssh::Error },
}

impl DeployError {
    pub fn phase(&self) -> Phase {
        match self {
            DeployError::PhaseFailed { phase, .. }
            | DeployError::PhaseTimedOut { phase, .. }
            | DeployError::Transport { phase, .. } => *phase,
        }
    }

    pub(crate) fn from_output(phase: Phase, output: &CommandOutput) -> Self {
        DeployError::PhaseFailed {
            phase,
            exit_code: output.exit_code,
            detail: failure_detail(output),
        }
    }

    pub(crate) fn from_transport(phase: Phase, source: ssh::Error) -> Self {
        match source {
            ssh::Error::Timeout(timeout) => DeployError::PhaseTimedOut { phase, timeout },
            other => DeployError::Transport {
                phase,
                source: other,
            },
        }
    }
}

/// Prefer stderr for the failure detail; ssh mirrors most remote errors
/// there, while stdout carries the partial transcript.
fn failure_detail(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = output.stdout.trim();
    if stdout.is_empty() {
        "no output".to_string()
    } else {
        stdout.to_string()
    }
}
