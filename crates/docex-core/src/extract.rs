// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Collect examples from a documentation tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::directive::parse_blocks;
use crate::error::{Error, Result};
use crate::example::{Example, ExampleKey, Language, SourceLocation};

/// File extensions scanned for examples.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md"];

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DOCUMENT_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Recursively collect document files under `root`, sorted by path.
pub fn collect_documents(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() && is_document(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Names become paths below the build directory: `/` separates
/// directories, but nothing may climb out of or skip a level.
pub fn check_example_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.starts_with('/') {
        return Err("must not start with `/`");
    }
    if name.contains('\\') || name.contains(':') {
        return Err("must not contain `\\` or `:`");
    }
    for segment in name.split('/') {
        match segment {
            "" => return Err("must not contain empty path segments"),
            "." | ".." => return Err("must not contain `.` or `..` segments"),
            _ => {}
        }
    }
    Ok(())
}

/// Extract the examples declared in one document.
pub fn extract_document(path: &Path, text: &str) -> Result<Vec<Example>> {
    parse_blocks(text)
        .into_iter()
        .map(|block| {
            let location = SourceLocation {
                path: path.to_path_buf(),
                line: block.line,
            };
            let language = Language::from_tag(&block.tag).ok_or_else(|| Error::UnsupportedLanguage {
                name: block.name.clone(),
                tag: block.tag.clone(),
                location: location.clone(),
            })?;
            if let Err(reason) = check_example_name(&block.name) {
                return Err(Error::InvalidExampleName { name: block.name, reason, location });
            }
            Ok(Example::new(block.name, language, block.flags, block.lines, location))
        })
        .collect()
}

/// Extract every example under `root`, sorted by `(name, language)`.
///
/// Fails on the first `(name, language)` declared twice.
pub fn extract_examples(root: &Path) -> Result<Vec<Example>> {
    let documents = collect_documents(root)?;
    info!(root = %root.display(), documents = documents.len(), "scanning documentation");

    let mut examples: BTreeMap<ExampleKey, Example> = BTreeMap::new();
    for path in &documents {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        for example in extract_document(path, &text)? {
            let key = example.key();
            if let Some(previous) = examples.get(&key) {
                return Err(Error::DuplicateExample {
                    key,
                    first: previous.location.clone(),
                    second: example.location,
                });
            }
            debug!(example = %key, location = %example.location, "found example");
            examples.insert(key, example);
        }
    }

    Ok(examples.into_values().collect())
}
