// ABOUTME: Rendering of the embedded remote verification script.
// ABOUTME: Substitutes the staging path, binary name, and help timeout.

/// Wall-clock bound for the staged binary's `--help` invocation. Kept
/// well under any permitted connection timeout so its expiry only kills
/// that one sub-invocation, not the enclosing ssh session.
pub const HELP_TIMEOUT_SECS: u64 = 10;

const TEMPLATE: &str = include_str!("verify.sh");

/// Render the verification script for one run.
///
/// The script inspects the host (kernel, CPU, memory), classifies the
/// staged binary, and exercises its `--help` entry point under a bounded
/// timeout. A failing `--help` run is reported in the transcript but
/// does not fail the script; any earlier diagnostic step failing does.
/// The orchestrator treats the output as opaque text and only looks at
/// the exit status.
pub fn render_script(staging_dir: &str, binary_name: &str, help_timeout_secs: u64) -> String {
    TEMPLATE
        .replace("@STAGING_DIR@", staging_dir)
        .replace("@BINARY@", binary_name)
        .replace("@HELP_TIMEOUT@", &help_timeout_secs.to_string())
}
