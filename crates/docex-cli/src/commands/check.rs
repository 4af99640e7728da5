// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Build, run and verify the selected examples.

use std::collections::BTreeSet;
use std::fs;
use std::time::Duration;

use colored::Colorize;
use docex_core::Language;
use docex_project::ProjectContext;
use docex_runner::{Outcome, Pipeline, Report, Runner, Status};
use tracing::info;

use super::{CliError, Session};
use crate::output;
use crate::Cli;

/// Returns whether every selected example passed.
pub fn cmd_check(cli: &Cli, session: &Session) -> Result<bool, CliError> {
    let pipeline = build_pipeline(cli, session)?;
    #[cfg(unix)]
    crate::interrupt::cancel_on_interrupt(pipeline.runner.cancel.clone());

    if !cli.skip_toolchain_check {
        let languages: BTreeSet<Language> = session.examples.iter().map(|e| e.language).collect();
        check_toolchains(&pipeline.runner, session, &languages)?;
    }

    let report = pipeline.sweep(session.examples.clone(), |outcome| print_outcome(&pipeline, outcome));
    print_summary(&report);
    Ok(report.success())
}

fn build_pipeline(cli: &Cli, session: &Session) -> Result<Pipeline, CliError> {
    let settings = &session.settings;
    let mut ctx = ProjectContext::new(&session.root, session.resolve(&settings.build_dir));
    ctx.asset_roots = settings.asset_roots.iter().map(|r| session.resolve(r)).collect();
    if let Some(path) = &cli.ufbx_rust_path {
        let path = fs::canonicalize(path)
            .map_err(|e| CliError::Usage(format!("--ufbx-rust-path {}: {}", path.display(), e)))?;
        ctx.library_override = Some(path);
    }

    Ok(Pipeline {
        ctx,
        frames_dir: session.resolve(&settings.frames_dir),
        outputs_dir: session.resolve(&settings.outputs_dir),
        runner: Runner::new(Duration::from_secs(settings.timeout_secs)),
    })
}

fn check_toolchains(runner: &Runner, session: &Session, languages: &BTreeSet<Language>) -> Result<(), CliError> {
    for &language in languages {
        let version = runner
            .probe_toolchain(language, &session.root)
            .map_err(|e| CliError::Toolchain { language, message: e.to_string() })?;
        info!(%language, version = version.lines().next().unwrap_or(""), "toolchain found");
    }
    Ok(())
}

fn print_outcome(pipeline: &Pipeline, outcome: &Outcome) {
    if outcome.passed() {
        println!("  {} {}", output::status_pass(), outcome.key);
        return;
    }

    println!("  {} {} - {}", output::status_fail(), outcome.key, outcome.status);
    match &outcome.status {
        Status::Mismatch(_) => {
            let expected = fs::read_to_string(pipeline.reference_path(&outcome.key.name)).unwrap_or_default();
            print_transcript("expected:", &expected);
            print_transcript("actual:", outcome.output.as_deref().unwrap_or(""));
        }
        Status::ProcessFailure { output: Some(text), .. } if !text.is_empty() => {
            print_transcript("output:", text);
        }
        _ => {}
    }
}

fn print_transcript(heading: &str, text: &str) {
    println!("    {}", heading.dimmed());
    for line in text.lines() {
        println!("      {}", output::transcript_line(line));
    }
}

fn print_summary(report: &Report) {
    println!();
    println!("{}", output::separator(50));
    println!(
        "{} examples, {}, {}",
        report.total(),
        output::passed_count(report.passed()),
        output::failed_count(report.failed())
    );
    if report.skipped() > 0 {
        println!("{}", output::section_header(&format!("Interrupted: {} examples not run", report.skipped())));
    }

    if report.failed() > 0 {
        println!("\n{}", output::section_header("Failed examples:"));
        for outcome in report.failures() {
            println!("  {} {} - {}", output::status_fail(), outcome.key, outcome.status);
        }
    }
    if !report.success() {
        println!("\n{}", output::banner_fail("Examples", report.failed() + report.skipped()));
    } else {
        println!("\n{}", output::banner_ok("Examples"));
    }
}
