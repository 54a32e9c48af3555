// ABOUTME: Remote invocation templates derived from a resolved config.
// ABOUTME: Builds argument vectors for the external ssh and scp binaries.

use super::runner::Invocation;
use crate::config::DeployConfig;
use std::collections::HashMap;
use std::time::Duration;

const SSH_PROGRAM: &str = "ssh";
const SCP_PROGRAM: &str = "scp";

/// Invocation templates for one target host.
///
/// Pure construction from a `DeployConfig`: building twice from the same
/// config yields identical templates. A session is rebuilt, never
/// mutated, if the configuration changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSession {
    target: String,
    base_args: Vec<String>,
    env: HashMap<String, String>,
    timeout: Duration,
}

impl RemoteSession {
    pub fn build(config: &DeployConfig) -> Self {
        let mut base_args: Vec<String> = config
            .ssh_opts
            .split_whitespace()
            .map(str::to_string)
            .collect();

        // Direct key use, never an agent: CI runners and lab laptops
        // don't have one, and the lab keys are throwaway anyway.
        if let Some(key) = &config.ssh_key {
            base_args.push("-i".to_string());
            base_args.push(key.display().to_string());
        }

        let mut env = HashMap::new();
        if let Some(askpass) = &config.ssh_askpass {
            // The askpass helper only fires for non-interactive prompts,
            // so interactive password authentication has to be off.
            base_args.push("-o".to_string());
            base_args.push("PasswordAuthentication=no".to_string());
            env.insert("SSH_ASKPASS".to_string(), askpass.display().to_string());
            env.insert("SSH_ASKPASS_REQUIRE".to_string(), "force".to_string());
            env.insert("DISPLAY".to_string(), ":0".to_string());
        }

        Self {
            target: format!("{}@{}", config.user, config.host),
            base_args,
            env,
            timeout: config.timeout,
        }
    }

    /// The `user@host` spec passed to ssh and used in scp remote operands.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// A remote-copy operand for `path` on the target host.
    pub fn remote_path(&self, path: &str) -> String {
        format!("{}:{}", self.target, path)
    }

    /// Environment entries exported to every transport invocation.
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Template for `ssh <opts> user@host <command>`.
    pub fn shell(&self, command: &str) -> Invocation {
        let mut args = self.base_args.clone();
        args.push(self.target.clone());
        args.push(command.to_string());
        Invocation {
            program: SSH_PROGRAM,
            args,
            env: self.env.clone(),
            timeout: self.timeout,
        }
    }

    /// Template for `scp <opts> [-r] <source> <dest>`.
    ///
    /// Used in both directions; the caller picks which operand is remote
    /// via [`RemoteSession::remote_path`].
    pub fn copy(&self, source: &str, dest: &str, recursive: bool) -> Invocation {
        let mut args = self.base_args.clone();
        if recursive {
            args.push("-r".to_string());
        }
        args.push(source.to_string());
        args.push(dest.to_string());
        Invocation {
            program: SCP_PROGRAM,
            args,
            env: self.env.clone(),
            timeout: self.timeout,
        }
    }
}
