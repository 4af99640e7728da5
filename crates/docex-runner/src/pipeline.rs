// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The per-example sweep: merge, materialize, run, verify.
//!
//! Anything that goes wrong for one example is recorded in its outcome and
//! the sweep moves on to the next example.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use docex_core::{check_example_name, merge_from_dir, Example};
use docex_project::{materialize, ProjectContext, ProjectLayout};
use tracing::{info, warn};

use crate::report::{Outcome, Report, Status};
use crate::runner::Runner;
use crate::verify::{verify, Verdict};

pub struct Pipeline {
    pub ctx: ProjectContext,
    /// Frame templates, `<name>.<ext>`
    pub frames_dir: PathBuf,
    /// Reference transcripts, `<name>.txt`
    pub outputs_dir: PathBuf,
    pub runner: Runner,
}

impl Pipeline {
    pub fn reference_path(&self, name: &str) -> PathBuf {
        self.outputs_dir.join(format!("{}.txt", name))
    }

    /// Run every example in order, calling `on_outcome` as each finishes.
    /// Stops early once the runner's cancel token is set.
    pub fn sweep(&self, examples: Vec<Example>, mut on_outcome: impl FnMut(&Outcome)) -> Report {
        let mut report = Report::default();
        let total = examples.len();
        for (i, example) in examples.into_iter().enumerate() {
            if self.runner.cancel.is_cancelled() {
                warn!(skipped = total - i, "sweep cancelled");
                report.skip(total - i);
                break;
            }
            let outcome = self.process(example);
            on_outcome(&outcome);
            report.add(outcome);
        }
        report
    }

    /// Process one extracted example to its outcome.
    pub fn process(&self, example: Example) -> Outcome {
        let key = example.key();
        let reference = self.reference_path(&example.name);

        if let Err(reason) = check_example_name(&key.name) {
            let message = format!("{}: example name {}", key, reason);
            warn!(example = %key, "{}", message);
            return Outcome { key, status: Status::Error(message), output: None };
        }
        if let Err(e) = self.clear_previous_run(&example) {
            warn!(example = %key, "failed to clear previous run: {}", e);
        }

        let layout = match self.prepare(example) {
            Ok(layout) => layout,
            Err(message) => {
                warn!(example = %key, "{}", message);
                return Outcome { key, status: Status::Error(message), output: None };
            }
        };

        let output = match self.runner.run(&layout) {
            Ok(output) => output,
            Err(e) => {
                let output = e.output().map(String::from);
                warn!(example = %key, output = output.as_deref().unwrap_or(""), "{}", e);
                if let Some(text) = &output {
                    self.write_transcript(&layout, text);
                }
                return Outcome {
                    key,
                    status: Status::ProcessFailure { message: e.to_string(), output },
                    output: None,
                };
            }
        };
        self.write_transcript(&layout, &output);

        let status = check_output(&reference, &output);
        info!(example = %key, status = %status, "finished");
        Outcome { key, status, output: Some(output) }
    }

    /// Remove the execution root and transcript of an earlier sweep so a
    /// failure before running cannot leave stale results behind.
    fn clear_previous_run(&self, example: &Example) -> io::Result<()> {
        let key = example.key();
        let run_root = self.ctx.run_root(&key);
        if run_root.exists() {
            fs::remove_dir_all(&run_root)?;
        }
        match fs::remove_file(self.ctx.transcript_path(&key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn prepare(&self, example: Example) -> Result<ProjectLayout, String> {
        let merged = merge_from_dir(example, &self.frames_dir).map_err(|e| e.to_string())?;
        materialize(&merged, &self.ctx).map_err(|e| e.to_string())
    }

    fn write_transcript(&self, layout: &ProjectLayout, output: &str) {
        if let Err(e) = write_transcript(&layout.transcript, output) {
            warn!(path = %layout.transcript.display(), "failed to write transcript: {}", e);
        }
    }
}

/// Compare `output` with the reference transcript at `reference`.
pub fn check_output(reference: &Path, output: &str) -> Status {
    match fs::read_to_string(reference) {
        Ok(expected) => match verify(&expected, output) {
            Verdict::Pass => Status::Passed,
            Verdict::Mismatch(m) => Status::Mismatch(m),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Status::MissingReference(reference.to_path_buf()),
        Err(e) => Status::Error(format!("{}: {}", reference.display(), e)),
    }
}

/// Write captured output next to the execution root.
pub fn write_transcript(path: &Path, output: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docex_core::{Language, SourceLocation};

    struct Fixture {
        dir: tempfile::TempDir,
        pipeline: Pipeline,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("frames")).unwrap();
        fs::create_dir_all(root.join("outputs")).unwrap();
        let pipeline = Pipeline {
            ctx: ProjectContext::new(root, root.join("build")),
            frames_dir: root.join("frames"),
            outputs_dir: root.join("outputs"),
            runner: Runner::default(),
        };
        Fixture { dir, pipeline }
    }

    impl Fixture {
        fn frame(&self, name: &str, text: &str) {
            fs::write(self.pipeline.frames_dir.join(name), text).unwrap();
        }

        fn reference(&self, name: &str, text: &str) {
            fs::write(self.pipeline.outputs_dir.join(format!("{}.txt", name)), text).unwrap();
        }
    }

    fn example(name: &str) -> Example {
        Example::new(
            name.into(),
            Language::C,
            vec![],
            vec!["int main(void) { return 0; }".into()],
            SourceLocation { path: PathBuf::from("doc.md"), line: 1 },
        )
    }

    #[cfg(unix)]
    #[test]
    fn test_pass_and_transcript() {
        let fx = fixture();
        fx.frame("hello.c", "// $ echo hello\n// EXAMPLE_SOURCE\n");
        fx.reference("hello", "hello\n");

        let outcome = fx.pipeline.process(example("hello"));
        assert_eq!(outcome.status, Status::Passed);

        let transcript = fx.dir.path().join("build/runs/c/hello.txt");
        assert_eq!(fs::read_to_string(transcript).unwrap(), "hello\n");
        assert!(fx.dir.path().join("build/runs/c/hello/main.c").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_is_isolated() {
        let fx = fixture();
        fx.frame("broken.c", "// $ false\n// $ touch second-ran\n// EXAMPLE_SOURCE\n");
        fx.frame("fine.c", "// $ echo ok\n// EXAMPLE_SOURCE\n");
        fx.reference("broken", "");
        fx.reference("fine", "ok\n");

        let mut seen = Vec::new();
        let report = fx
            .pipeline
            .sweep(vec![example("broken"), example("fine")], |o| seen.push(o.key.name.clone()));

        assert_eq!(seen, vec!["broken", "fine"]);
        assert_eq!(report.total(), 2);
        assert_eq!(report.passed(), 1);
        assert!(matches!(report.outcomes()[0].status, Status::ProcessFailure { .. }));
        assert!(!fx.dir.path().join("build/runs/c/broken/second-ran").exists());
        assert_eq!(report.outcomes()[1].status, Status::Passed);
        assert!(!report.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_mismatch_and_missing_reference() {
        let fx = fixture();
        fx.frame("diff.c", "// $ echo actual\n// EXAMPLE_SOURCE\n");
        fx.frame("noref.c", "// $ echo anything\n// EXAMPLE_SOURCE\n");
        fx.reference("diff", "expected\n");

        let outcome = fx.pipeline.process(example("diff"));
        match outcome.status {
            Status::Mismatch(m) => {
                assert_eq!(m.line, 1);
                assert_eq!(m.expected.as_deref(), Some("expected"));
                assert_eq!(m.actual.as_deref(), Some("actual"));
            }
            other => panic!("expected mismatch, got {:?}", other),
        }

        let outcome = fx.pipeline.process(example("noref"));
        assert!(matches!(outcome.status, Status::MissingReference(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_prepare_clears_previous_run() {
        let fx = fixture();
        fx.frame("hello.c", "// $ echo hello\n// EXAMPLE_SOURCE\n");
        fx.reference("hello", "hello\n");
        assert_eq!(fx.pipeline.process(example("hello")).status, Status::Passed);

        let transcript = fx.dir.path().join("build/runs/c/hello.txt");
        let run_root = fx.dir.path().join("build/runs/c/hello");
        assert!(transcript.is_file());
        assert!(run_root.is_dir());

        // No placeholder: the frame no longer merges.
        fx.frame("hello.c", "// $ echo hello\n");
        let outcome = fx.pipeline.process(example("hello"));
        assert!(matches!(outcome.status, Status::Error(_)));
        assert!(!transcript.exists());
        assert!(!run_root.exists());
    }

    #[test]
    fn test_invalid_name_touches_nothing() {
        let fx = fixture();
        let outside = fx.dir.path().join("precious");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("keep.txt"), "keep").unwrap();

        let outcome = fx.pipeline.process(example("../../../precious"));
        assert!(matches!(outcome.status, Status::Error(ref m) if m.contains("..")));
        assert!(outside.join("keep.txt").is_file());
    }

    #[test]
    fn test_cancelled_sweep_skips_the_rest() {
        let fx = fixture();
        fx.pipeline.runner.cancel.cancel();

        let mut seen = 0;
        let report = fx.pipeline.sweep(vec![example("a"), example("b")], |_| seen += 1);
        assert_eq!(seen, 0);
        assert_eq!(report.total(), 0);
        assert_eq!(report.skipped(), 2);
        assert!(!report.success());
        assert!(!fx.dir.path().join("build").exists());
    }

    #[test]
    fn test_unknown_crate_fails_before_running() {
        let fx = fixture();
        fs::write(
            fx.pipeline.frames_dir.join("crate.rs"),
            "// $crate nonexistent\n// $ touch ran\n// EXAMPLE_SOURCE\n",
        )
        .unwrap();
        let mut ex = example("crate");
        ex.language = Language::Rust;

        let outcome = fx.pipeline.process(ex);
        assert!(matches!(outcome.status, Status::Error(ref m) if m.contains("nonexistent")));
        assert!(!fx.dir.path().join("build/runs/rust/crate").exists());
    }
}
