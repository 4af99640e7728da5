// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Toolchain invocation errors.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// A failed build/run step. Always local to one example.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no commands to run")]
    EmptySequence,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
        output: String,
    },

    #[error("`{command}` timed out after {}s", after.as_secs())]
    TimedOut {
        command: String,
        after: Duration,
        output: String,
    },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String, output: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunError::Io { path: path.into(), source }
    }

    /// Output captured from the failing command, if it got that far.
    pub fn output(&self) -> Option<&str> {
        match self {
            RunError::Failed { output, .. }
            | RunError::TimedOut { output, .. }
            | RunError::Cancelled { output, .. } => Some(output),
            _ => None,
        }
    }
}
