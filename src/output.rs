// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Prints phase markers and the final banner in normal, quiet, or JSON mode.

use crate::deploy::Phase;
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with per-phase progress markers
    Normal,
    /// Minimal output for CI (warnings, errors, and the final banner)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing the run.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since the timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print the run header (suppressed in quiet/json mode).
    pub fn header(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a phase start marker.
    pub fn phase_start(&self, phase: Phase) {
        match self.mode {
            OutputMode::Normal => println!("  → {}...", phase.describe()),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(JsonEvent {
                event: "phase_start",
                phase: Some(phase.name()),
                message: phase.describe(),
                duration_secs: None,
            }),
        }
    }

    /// Print a phase success marker.
    pub fn phase_success(&self, phase: Phase) {
        match self.mode {
            OutputMode::Normal => println!("  ✓ {}", phase.describe()),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(JsonEvent {
                event: "phase_success",
                phase: Some(phase.name()),
                message: phase.describe(),
                duration_secs: None,
            }),
        }
    }

    /// Print a phase failure marker. The detail already names the phase.
    pub fn phase_failure(&self, phase: Phase, detail: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("  ✗ {detail}");
            }
            OutputMode::Json => self.emit_err(JsonEvent {
                event: "phase_failure",
                phase: Some(phase.name()),
                message: detail,
                duration_secs: None,
            }),
        }
    }

    /// Print the captured verification transcript (normal mode only; it
    /// is opaque text, JSON consumers get the phase events instead).
    pub fn transcript(&self, text: &str) {
        if self.mode == OutputMode::Normal && !text.trim().is_empty() {
            println!("{}", text.trim_end());
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_err(JsonEvent {
                event: "warning",
                phase: None,
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print the overall success banner with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({elapsed:.1}s)");
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => self.emit(JsonEvent {
                event: "success",
                phase: None,
                message,
                duration_secs: self.start_time.map(|_| self.elapsed_secs()),
            }),
        }
    }

    /// Print the overall failure banner.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_err(JsonEvent {
                event: "error",
                phase: None,
                message,
                duration_secs: self.start_time.map(|_| self.elapsed_secs()),
            }),
        }
    }

    fn emit(&self, event: JsonEvent) {
        if let Ok(json) = serde_json::to_string(&event) {
            println!("{json}");
        }
    }

    fn emit_err(&self, event: JsonEvent) {
        if let Ok(json) = serde_json::to_string(&event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<&'a str>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
