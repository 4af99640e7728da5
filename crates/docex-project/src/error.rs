// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Materialization error types.

use std::path::PathBuf;

use docex_core::ExampleKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectError>;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{key}: dependency `{token}` is not a known bundle and matches no file in {}", format_roots(searched))]
    UnresolvableDependency {
        key: ExampleKey,
        token: String,
        searched: Vec<PathBuf>,
    },

    #[error("{key}: example name {reason}")]
    InvalidName { key: ExampleKey, reason: &'static str },

    #[error("{key}: invalid dependency pattern `{token}`: {message}")]
    InvalidPattern {
        key: ExampleKey,
        token: String,
        message: String,
    },

    #[error("{key}: unknown crate `{token}` (no version registered)")]
    UnresolvableCrate { key: ExampleKey, token: String },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] toml::ser::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjectError::Io { path: path.into(), source }
    }
}

fn format_roots(roots: &[PathBuf]) -> String {
    if roots.is_empty() {
        return "<no asset roots>".to_string();
    }
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
