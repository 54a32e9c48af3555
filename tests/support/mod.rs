// ABOUTME: Test support: a scripted CommandRunner that records invocations.
// ABOUTME: Lets orchestrator tests inject failures or timeouts at any step.

use armtest::ssh::{self, CommandOutput, CommandRunner, Invocation};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock should do for one invocation, in call order. Steps
/// beyond the scripted list succeed with empty output.
#[derive(Debug, Clone)]
pub enum Step {
    Succeed,
    SucceedWith(&'static str),
    Fail(i32, &'static str),
    TimeOut,
}

pub struct MockRunner {
    steps: Mutex<Vec<Step>>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    pub fn all_ok() -> Self {
        Self::with_steps(vec![])
    }

    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds up to `index`, then fails there.
    pub fn failing_at(index: usize) -> Self {
        let mut steps = vec![Step::Succeed; index];
        steps.push(Step::Fail(1, "injected failure"));
        Self::with_steps(steps)
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether a staging-directory removal was ever issued.
    pub fn cleanup_attempted(&self) -> bool {
        self.calls()
            .iter()
            .any(|inv| inv.args.iter().any(|a| a == "rm -rf /tmp/mujina-test"))
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, invocation: &Invocation) -> ssh::Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let step = {
            let mut steps = self.steps.lock().unwrap();
            if steps.is_empty() {
                Step::Succeed
            } else {
                steps.remove(0)
            }
        };
        match step {
            Step::Succeed => Ok(output(0, "", "")),
            Step::SucceedWith(stdout) => Ok(output(0, stdout, "")),
            Step::Fail(code, stderr) => Ok(output(code, "", stderr)),
            Step::TimeOut => Err(ssh::Error::Timeout(Duration::from_secs(1))),
        }
    }
}

fn output(exit_code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}
