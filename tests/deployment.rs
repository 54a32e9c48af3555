// ABOUTME: Orchestrator integration tests against a scripted mock transport.
// ABOUTME: Covers phase ordering, abort-on-failure, and guaranteed cleanup.

mod support;

use armtest::config::{DEFAULT_SSH_OPTS, DeployConfig};
use armtest::deploy::{CleanupStatus, Deployment, Phase, RunReport};
use armtest::diagnostics::Diagnostics;
use armtest::output::{Output, OutputMode};
use armtest::ssh::RemoteSession;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use support::{MockRunner, Step};

fn config() -> DeployConfig {
    DeployConfig {
        host: "10.0.0.5".to_string(),
        user: "pi".to_string(),
        binary: PathBuf::from("./minerd-arm64"),
        test_mode: false,
        ssh_key: None,
        ssh_opts: DEFAULT_SSH_OPTS.to_string(),
        ssh_askpass: None,
        timeout: Duration::from_secs(300),
    }
}

async fn run_with(
    config: &DeployConfig,
    runner: &MockRunner,
    test_data: &Path,
) -> (RunReport, Diagnostics) {
    let session = RemoteSession::build(config);
    let output = Output::new(OutputMode::Quiet);
    let mut diag = Diagnostics::default();
    let report = Deployment::new(&session, runner, &output)
        .run(&config.binary, test_data, &mut diag)
        .await;
    (report, diag)
}

fn absent_dir() -> PathBuf {
    PathBuf::from("no-such-test-data-dir")
}

#[tokio::test]
async fn happy_path_runs_all_phases_then_cleanup() {
    let runner = MockRunner::all_ok();
    let (report, diag) = run_with(&config(), &runner, &absent_dir()).await;

    assert!(report.success());
    assert!(report.cleanup.succeeded());
    assert!(!diag.has_warnings());

    let executed: Vec<Phase> = report.phases.iter().map(|p| p.phase).collect();
    assert_eq!(
        executed,
        vec![
            Phase::Workspace,
            Phase::ClearStale,
            Phase::Upload,
            Phase::Verify
        ]
    );

    let calls = runner.calls();
    assert_eq!(calls.len(), 5, "four mandatory phases plus cleanup");
    assert_eq!(calls[0].program, "ssh");
    assert!(calls[0].args.contains(&"pi@10.0.0.5".to_string()));
    assert_eq!(
        calls[0].args.last().map(String::as_str),
        Some("mkdir -p /tmp/mujina-test")
    );
    assert_eq!(
        calls[1].args.last().map(String::as_str),
        Some("rm -f /tmp/mujina-test/minerd")
    );
    assert_eq!(calls[2].program, "scp");
    assert!(
        calls[2]
            .args
            .contains(&"pi@10.0.0.5:/tmp/mujina-test/minerd".to_string())
    );
    assert!(
        calls[3].args.last().unwrap().contains("--help"),
        "verification script runs the help probe"
    );
    assert_eq!(
        calls[4].args.last().map(String::as_str),
        Some("rm -rf /tmp/mujina-test")
    );
}

#[tokio::test]
async fn test_data_directory_is_uploaded_recursively_when_present() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("test-data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(data_dir.join("pool.conf"), "stratum+tcp://pool:3333\n").unwrap();

    let runner = MockRunner::all_ok();
    let (report, _) = run_with(&config(), &runner, &data_dir).await;

    assert!(report.success());
    let executed: Vec<Phase> = report.phases.iter().map(|p| p.phase).collect();
    assert_eq!(
        executed,
        vec![
            Phase::Workspace,
            Phase::ClearStale,
            Phase::Upload,
            Phase::TestData,
            Phase::Verify
        ]
    );

    let calls = runner.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[3].program, "scp");
    assert!(calls[3].args.contains(&"-r".to_string()));
    assert!(
        calls[3]
            .args
            .contains(&"pi@10.0.0.5:/tmp/mujina-test".to_string())
    );
}

#[tokio::test]
async fn absent_test_data_directory_is_skipped_silently() {
    let runner = MockRunner::all_ok();
    let (report, diag) = run_with(&config(), &runner, &absent_dir()).await;

    assert!(report.success());
    assert!(!diag.has_warnings());
    assert!(
        !report.phases.iter().any(|p| p.phase == Phase::TestData),
        "skip must not show up as a phase result"
    );
}

#[tokio::test]
async fn cleanup_always_runs_no_matter_which_phase_fails() {
    for failing_step in 0..4usize {
        let runner = MockRunner::failing_at(failing_step);
        let (report, diag) = run_with(&config(), &runner, &absent_dir()).await;

        assert!(!report.success(), "step {failing_step}");
        assert!(runner.cleanup_attempted(), "step {failing_step}");

        // The failed phase is the last one attempted; nothing after it
        // runs except cleanup.
        let last = report.phases.last().unwrap();
        assert!(!last.success, "step {failing_step}");
        assert_eq!(report.phases.len(), failing_step + 1, "step {failing_step}");
        assert_eq!(runner.calls().len(), failing_step + 2, "step {failing_step}");

        assert!(report.cleanup.succeeded(), "step {failing_step}");
        assert!(!diag.has_warnings(), "step {failing_step}");
    }
}

#[tokio::test]
async fn upload_failure_skips_verification() {
    let runner = MockRunner::failing_at(2);
    let (report, _) = run_with(&config(), &runner, &absent_dir()).await;

    assert!(!report.success());
    let last = report.phases.last().unwrap();
    assert_eq!(last.phase, Phase::Upload);
    assert!(last.detail.contains("injected failure"));

    assert!(
        !runner
            .calls()
            .iter()
            .any(|inv| inv.args.last().unwrap().contains("--help")),
        "verification must not run after a failed upload"
    );
    assert!(runner.cleanup_attempted());
}

#[tokio::test]
async fn transport_timeout_fails_the_phase() {
    let runner = MockRunner::with_steps(vec![Step::Succeed, Step::Succeed, Step::TimeOut]);
    let (report, _) = run_with(&config(), &runner, &absent_dir()).await;

    assert!(!report.success());
    let last = report.phases.last().unwrap();
    assert_eq!(last.phase, Phase::Upload);
    assert!(last.detail.contains("timed out"));
    assert!(runner.cleanup_attempted());
}

#[tokio::test]
async fn cleanup_failure_is_reported_but_not_fatal() {
    let runner = MockRunner::with_steps(vec![
        Step::Succeed,
        Step::Succeed,
        Step::Succeed,
        Step::Succeed,
        Step::Fail(1, "device busy"),
    ]);
    let (report, diag) = run_with(&config(), &runner, &absent_dir()).await;

    assert!(report.success(), "cleanup failure never fails the run");
    assert!(matches!(report.cleanup, CleanupStatus::Failed(_)));
    assert!(diag.has_warnings());
    assert!(diag.warnings()[0].message.contains("device busy"));
}

#[tokio::test]
async fn verification_transcript_is_kept_on_the_report() {
    let runner = MockRunner::with_steps(vec![
        Step::Succeed,
        Step::Succeed,
        Step::Succeed,
        Step::SucceedWith("--- kernel ---\nLinux pi 6.6.20 aarch64\nverification finished"),
    ]);
    let (report, _) = run_with(&config(), &runner, &absent_dir()).await;

    let verify = report
        .phases
        .iter()
        .find(|p| p.phase == Phase::Verify)
        .unwrap();
    assert!(verify.detail.contains("verification finished"));
}

#[tokio::test]
async fn askpass_env_rides_along_on_every_invocation() {
    let mut cfg = config();
    cfg.ssh_askpass = Some(PathBuf::from("/usr/local/bin/lab-askpass"));

    let runner = MockRunner::all_ok();
    let (report, _) = run_with(&cfg, &runner, &absent_dir()).await;

    assert!(report.success());
    for call in runner.calls() {
        assert_eq!(
            call.env.get("SSH_ASKPASS").map(String::as_str),
            Some("/usr/local/bin/lab-askpass")
        );
        assert_eq!(
            call.env.get("SSH_ASKPASS_REQUIRE").map(String::as_str),
            Some("force")
        );
    }
}
