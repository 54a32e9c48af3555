// ABOUTME: Entry point for the armtest CLI.
// ABOUTME: Resolves configuration, runs the deployment pipeline, and maps exit codes.

mod cli;

use armtest::config::{self, Overrides};
use armtest::deploy::{Deployment, RunReport, TEST_DATA_DIR};
use armtest::diagnostics::Diagnostics;
use armtest::error::Result;
use armtest::output::{Output, OutputMode};
use armtest::ssh::{ProcessRunner, RemoteSession};
use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use std::collections::HashMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Help and version exit 0; every other parse problem exits 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);
    output.start_timer();

    match run(cli, &output).await {
        Ok(report) if report.success() => {
            output.success("deployment verification succeeded");
        }
        Ok(_) => {
            output.error("deployment verification failed");
            std::process::exit(1);
        }
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<RunReport> {
    let mut diag = Diagnostics::default();
    let process_env: HashMap<String, String> = std::env::vars().collect();
    let overrides = Overrides {
        host: cli.host,
        user: cli.user,
        binary: cli.binary,
        test_mode: cli.test_mode,
        ssh_key: cli.ssh_key,
        timeout: cli.timeout,
    };

    let resolved = config::resolve(
        Path::new(config::ENV_FILENAME),
        &process_env,
        overrides,
        &mut diag,
    );
    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            emit_warnings(output, &diag);
            return Err(e.into());
        }
    };

    output.header(&format!(
        "deploying {} to {}@{}{}",
        config.binary.display(),
        config.user,
        config.host,
        if config.test_mode { " (test mode)" } else { "" },
    ));

    let session = RemoteSession::build(&config);
    let runner = ProcessRunner;
    let report = Deployment::new(&session, &runner, output)
        .run(&config.binary, Path::new(TEST_DATA_DIR), &mut diag)
        .await;

    emit_warnings(output, &diag);
    Ok(report)
}

fn emit_warnings(output: &Output, diag: &Diagnostics) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
