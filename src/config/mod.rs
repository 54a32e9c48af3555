// ABOUTME: Configuration resolution for armtest runs.
// ABOUTME: Merges the optional env file, process environment, and CLI flags with strict precedence.

mod env_file;

use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::diagnostics::{Diagnostics, Warning};

/// Fixed relative path of the optional env file.
pub const ENV_FILENAME: &str = ".armtest.env";

/// Default ssh options. The targets are ephemeral lab boards that get
/// reimaged constantly, so host keys are neither checked nor persisted.
pub const DEFAULT_SSH_OPTS: &str = "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null";

/// Default per-invocation connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const KEY_HOST: &str = "ARM_HOST";
const KEY_USER: &str = "ARM_USER";
const KEY_SSH_KEY: &str = "SSH_KEY";
const KEY_SSH_OPTS: &str = "SSH_OPTS";
const KEY_SSH_ASKPASS: &str = "SSH_ASKPASS";
const KEY_TIMEOUT: &str = "TIMEOUT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("binary not found: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved configuration for a single run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub host: String,
    pub user: String,
    pub binary: PathBuf,
    /// Parsed and carried through, but currently alters no behavior.
    pub test_mode: bool,
    pub ssh_key: Option<PathBuf>,
    pub ssh_opts: String,
    pub ssh_askpass: Option<PathBuf>,
    pub timeout: Duration,
}

/// Explicit overrides from the command line. Highest precedence.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub binary: Option<PathBuf>,
    pub test_mode: bool,
    pub ssh_key: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// Merge the env file, process environment, and CLI overrides into a
/// validated `DeployConfig`.
///
/// Precedence, lowest to highest: env file, process environment, CLI.
/// Resolution is purely local; the one side effect on success is marking
/// the binary executable, which the remote verification script requires
/// (scp preserves mode bits on upload).
pub fn resolve(
    env_file: &Path,
    process_env: &HashMap<String, String>,
    overrides: Overrides,
    diag: &mut Diagnostics,
) -> Result<DeployConfig, ConfigError> {
    let mut merged = match env_file::load(env_file) {
        Ok(values) => values,
        Err(e) => {
            diag.warn(Warning::env_file(format!(
                "ignoring env file {}: {}",
                env_file.display(),
                e
            )));
            HashMap::new()
        }
    };

    for (key, value) in process_env {
        merged.insert(key.clone(), value.clone());
    }

    let host = overrides
        .host
        .filter(|s| !s.trim().is_empty())
        .or_else(|| lookup(&merged, KEY_HOST))
        .ok_or(ConfigError::MissingRequired("host"))?;

    let user = overrides
        .user
        .filter(|s| !s.trim().is_empty())
        .or_else(|| lookup(&merged, KEY_USER))
        .ok_or(ConfigError::MissingRequired("user"))?;

    let binary = overrides
        .binary
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ConfigError::MissingRequired("binary"))?;

    let ssh_key = overrides
        .ssh_key
        .or_else(|| lookup(&merged, KEY_SSH_KEY).map(PathBuf::from));

    let ssh_opts = lookup(&merged, KEY_SSH_OPTS).unwrap_or_else(|| DEFAULT_SSH_OPTS.to_string());
    let ssh_askpass = lookup(&merged, KEY_SSH_ASKPASS).map(PathBuf::from);

    let timeout = match overrides.timeout {
        Some(0) => return Err(ConfigError::InvalidTimeout("0".to_string())),
        Some(secs) => Duration::from_secs(secs),
        None => match lookup(&merged, KEY_TIMEOUT) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        },
    };

    if !binary.is_file() {
        return Err(ConfigError::ArtifactNotFound(binary));
    }
    mark_executable(&binary)?;

    Ok(DeployConfig {
        host,
        user,
        binary,
        test_mode: overrides.test_mode,
        ssh_key,
        ssh_opts,
        ssh_askpass,
        timeout,
    })
}

/// Non-empty lookup: a key set to an empty or whitespace value counts as
/// unset, matching how the original env-driven workflow treated blanks.
fn lookup(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn mark_executable(path: &Path) -> Result<(), std::io::Error> {
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
}
