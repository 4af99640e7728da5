// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Execute a project's command sequence in a fresh copy of its build root.

use std::fs;
use std::path::Path;
use std::time::Duration;

use docex_core::Language;
use docex_project::ProjectLayout;
use tracing::info;
use walkdir::WalkDir;

use crate::command::CommandLine;
use crate::error::RunError;
use crate::process::{run_command, CancelToken};

pub struct Runner {
    /// Per-command limit
    pub timeout: Duration,
    pub cancel: CancelToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl Runner {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: CancelToken::new(),
        }
    }

    /// Copy the build root into a cleared execution root and run the
    /// project's commands there. Returns the last command's output.
    pub fn run(&self, layout: &ProjectLayout) -> Result<String, RunError> {
        prepare_run_root(&layout.path, &layout.run_path)?;
        info!(example = %layout.key, run_root = %layout.run_path.display(), "running");
        self.run_sequence(&layout.setup_lines, &layout.run_path)
    }

    /// Run `lines` in order inside `cwd`, stopping at the first failure.
    pub fn run_sequence(&self, lines: &[String], cwd: &Path) -> Result<String, RunError> {
        let commands: Vec<CommandLine> = lines.iter().filter_map(|l| CommandLine::parse(l)).collect();
        if commands.is_empty() {
            return Err(RunError::EmptySequence);
        }

        let mut last_output = String::new();
        for cmd in &commands {
            if self.cancel.is_cancelled() {
                return Err(RunError::Cancelled {
                    command: cmd.to_string(),
                    output: String::new(),
                });
            }
            let result = run_command(cmd, cwd, self.timeout, &self.cancel)?;
            if !result.status.success() {
                return Err(RunError::Failed {
                    command: cmd.to_string(),
                    status: result.status,
                    output: result.output,
                });
            }
            last_output = result.output;
        }
        Ok(last_output)
    }

    /// Run the language's version probe in `cwd`.
    pub fn probe_toolchain(&self, language: Language, cwd: &Path) -> Result<String, RunError> {
        self.run_sequence(&[language.version_probe().to_string()], cwd)
    }
}

/// Replace `run_root` with a full recursive copy of `build_root`.
pub fn prepare_run_root(build_root: &Path, run_root: &Path) -> Result<(), RunError> {
    if run_root.exists() {
        fs::remove_dir_all(run_root).map_err(|e| RunError::io(run_root, e))?;
    }
    copy_dir(build_root, run_root)
}

/// Recursively copy `src` into `dst`, preserving file permissions.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), RunError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            RunError::io(path, e.into())
        })?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| RunError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| RunError::io(entry.path(), e))?;
        }
    }
    Ok(())
}
