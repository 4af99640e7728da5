// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Frame templates that wrap a snippet into a complete program.
//!
//! A frame starts with a meta block of (optionally commented) `$` lines,
//! followed by a body with a single `EXAMPLE_SOURCE` placeholder line:
//!
//! ```text
//! // $dep ufbx light.fbx
//! // $ clang ufbx.c main.c -lm -o example
//! // $ ./example
//! #include "ufbx.h"
//!
//! // -- EXAMPLE_SOURCE --
//!
//! int main() { ... }
//! ```
//!
//! The first line that is not a directive ends the meta block for good.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::example::{Example, Language};

/// Token marking where the snippet is spliced into the frame body.
pub const PLACEHOLDER: &str = "EXAMPLE_SOURCE";

/// A meta-block directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `$dep a b c`
    Dependency(Vec<String>),
    /// `$crate a b c`
    Crate(Vec<String>),
    /// `$ command args` (sigil stripped)
    RawSetupLine(String),
}

/// Classify a frame line, returning `None` if it is not a directive.
pub fn classify_meta_line(line: &str) -> Option<Directive> {
    let trimmed = line.trim_start();
    let uncommented = trimmed
        .strip_prefix("//")
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed)
        .trim();
    let rest = uncommented.strip_prefix('$')?;

    if let Some(tokens) = keyword_tokens(rest, "dep") {
        Some(Directive::Dependency(tokens))
    } else if let Some(tokens) = keyword_tokens(rest, "crate") {
        Some(Directive::Crate(tokens))
    } else {
        Some(Directive::RawSetupLine(rest.trim().to_string()))
    }
}

/// `dep a b` with keyword "dep" → `["a", "b"]`. The keyword must be followed
/// by whitespace or end the line.
fn keyword_tokens(rest: &str, keyword: &str) -> Option<Vec<String>> {
    let after = rest.strip_prefix(keyword)?;
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }
    Some(after.split_whitespace().map(String::from).collect())
}

/// A parsed frame template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub directives: Vec<Directive>,
    pub body: Vec<String>,
}

impl Frame {
    pub fn parse(text: &str) -> Self {
        let mut directives = Vec::new();
        let mut body = Vec::new();
        let mut in_meta = true;

        for line in text.lines() {
            if in_meta {
                if let Some(directive) = classify_meta_line(line) {
                    directives.push(directive);
                    continue;
                }
                in_meta = false;
            }
            body.push(line.to_string());
        }

        Frame { directives, body }
    }

    /// Number of body lines containing the placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.body.iter().filter(|l| l.contains(PLACEHOLDER)).count()
    }

    /// Replace the placeholder line with `snippet`, each line indented like
    /// the placeholder. Assumes exactly one placeholder.
    pub fn splice(&self, snippet: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(self.body.len() + snippet.len());
        for line in &self.body {
            if line.contains(PLACEHOLDER) {
                let indent_len = line.len() - line.trim_start().len();
                let indent = &line[..indent_len];
                out.extend(snippet.iter().map(|s| format!("{}{}", indent, s)));
            } else {
                out.push(line.clone());
            }
        }
        out
    }
}

/// Path of the frame for `(name, language)`: `<frames_dir>/<name>.<ext>`.
pub fn frame_path(frames_dir: &Path, name: &str, language: Language) -> PathBuf {
    frames_dir.join(format!("{}.{}", name, language.frame_extension()))
}

/// Merge an example with its frame (if any).
///
/// Without directives the language defaults supply the dependencies and
/// the build/run sequence.
pub fn merge(mut example: Example, frame: Option<(&Path, &Frame)>) -> Result<Example> {
    let mut directives: &[Directive] = &[];

    if let Some((path, frame)) = frame {
        let count = frame.placeholder_count();
        if count != 1 {
            return Err(Error::PlaceholderCount {
                path: path.to_path_buf(),
                count,
            });
        }
        example.lines = frame.splice(&example.lines);
        directives = &frame.directives;
    }

    if directives.is_empty() {
        let lang = example.language;
        add_dependencies(&mut example, lang.default_dependencies().iter().map(|s| s.to_string()));
        example.setup_lines = lang.default_setup().iter().map(|s| s.to_string()).collect();
        return Ok(example);
    }

    for directive in directives {
        match directive {
            Directive::Dependency(tokens) => add_dependencies(&mut example, tokens.iter().cloned()),
            Directive::Crate(tokens) => example.crates.extend(tokens.iter().cloned()),
            Directive::RawSetupLine(line) => example.setup_lines.push(line.clone()),
        }
    }
    Ok(example)
}

fn add_dependencies(example: &mut Example, tokens: impl Iterator<Item = String>) {
    for token in tokens {
        if !example.dependencies.contains(&token) {
            example.dependencies.push(token);
        }
    }
}

/// Look up the example's frame in `frames_dir` and merge it.
pub fn merge_from_dir(example: Example, frames_dir: &Path) -> Result<Example> {
    let path = frame_path(frames_dir, &example.name, example.language);
    match fs::read_to_string(&path) {
        Ok(text) => {
            debug!(example = %example.key(), frame = %path.display(), "merging frame");
            let frame = Frame::parse(&text);
            merge(example, Some((&path, &frame)))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => merge(example, None),
        Err(e) => Err(Error::io(path, e)),
    }
}
