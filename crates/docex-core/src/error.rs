// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Extraction and merge error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::example::{ExampleKey, SourceLocation};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate example {key}: defined at {first} and again at {second}")]
    DuplicateExample {
        key: ExampleKey,
        first: SourceLocation,
        second: SourceLocation,
    },

    #[error("example `{name}` at {location} uses unsupported language `{tag}`")]
    UnsupportedLanguage {
        name: String,
        tag: String,
        location: SourceLocation,
    },

    #[error("example `{name}` at {location} has an invalid name: {reason}")]
    InvalidExampleName {
        name: String,
        reason: &'static str,
        location: SourceLocation,
    },

    #[error("frame {} must contain exactly one `EXAMPLE_SOURCE` line, found {count}", path.display())]
    PlaceholderCount { path: PathBuf, count: usize },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
