// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-example outcomes and sweep totals.

use std::fmt;
use std::path::PathBuf;

use docex_core::ExampleKey;

use crate::verify::Mismatch;

/// How one example ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Passed,
    /// Output differs from the reference transcript.
    Mismatch(Mismatch),
    /// A build/run command failed, timed out or could not start.
    ProcessFailure { message: String, output: Option<String> },
    MissingReference(PathBuf),
    /// The example could not be prepared (frame or dependency problems).
    Error(String),
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub key: ExampleKey,
    pub status: Status,
    /// Captured output of the last command, when the sequence completed.
    pub output: Option<String>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Passed => f.write_str("passed"),
            Status::Mismatch(m) => write!(f, "output mismatch at {}", m),
            Status::ProcessFailure { message, .. } => write!(f, "toolchain failure: {}", message),
            Status::MissingReference(path) => write!(f, "missing reference transcript {}", path.display()),
            Status::Error(message) => f.write_str(message),
        }
    }
}

/// Summary of a sweep.
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<Outcome>,
    /// Examples never started because the sweep was cancelled.
    skipped: usize,
}

impl Report {
    pub fn add(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn skip(&mut self, count: usize) {
        self.skipped += count;
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// True when every example ran and passed.
    pub fn success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }
}
