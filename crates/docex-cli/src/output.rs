// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal output with colors.
//!
//! Respects NO_COLOR and FORCE_COLOR. Colors are disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn banner_ok(what: &str) -> String {
    format!("{} {} {}", "===".dimmed(), format!("{} OK", what).green().bold(), "===".dimmed())
}

pub fn banner_fail(what: &str, count: usize) -> String {
    let msg = if count == 1 {
        format!("{} FAILED: 1 example", what)
    } else {
        format!("{} FAILED: {} examples", what, count)
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

pub fn transcript_line(line: &str) -> ColoredString {
    line.dimmed()
}

pub fn passed_count(n: usize) -> ColoredString {
    format!("{} passed", n).green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} failed", n).red()
    } else {
        format!("{} failed", n).normal()
    }
}
