// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Single flat command; host and user may come from the environment instead.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "armtest")]
#[command(about = "Deploy and verify a cross-compiled minerd build on remote ARM hardware")]
#[command(version)]
pub struct Cli {
    /// Target host address (falls back to ARM_HOST)
    #[arg(long, value_name = "IP")]
    pub host: Option<String>,

    /// Remote username (falls back to ARM_USER)
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// Local binary to stage on the target
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Mark the run as a test-mode run (informational)
    #[arg(long)]
    pub test_mode: bool,

    /// Private key for remote authentication (falls back to SSH_KEY)
    #[arg(long, value_name = "PATH")]
    pub ssh_key: Option<PathBuf>,

    /// Per-invocation connection timeout in seconds (falls back to TIMEOUT)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Minimal output for CI
    #[arg(long)]
    pub quiet: bool,

    /// JSON event output
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
