// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.

pub mod check;
pub mod list;

use std::fs;
use std::path::{Path, PathBuf};

use docex_core::{extract_examples, Example, Language};
use thiserror::Error;

use crate::config::{ConfigError, Settings};
use crate::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Extract(#[from] docex_core::Error),
    #[error("toolchain check for {language} failed: {message}")]
    Toolchain { language: Language, message: String },
}

impl CliError {
    /// Usage and toolchain setup problems exit 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::Toolchain { .. } => 2,
            CliError::Config(_) | CliError::Extract(_) => 1,
        }
    }
}

/// Repository root, merged settings and the selected examples.
pub struct Session {
    pub root: PathBuf,
    pub settings: Settings,
    pub examples: Vec<Example>,
}

impl Session {
    pub fn open(cli: &Cli) -> Result<Self, CliError> {
        let root = fs::canonicalize(&cli.root)
            .map_err(|e| CliError::Usage(format!("repository root {}: {}", cli.root.display(), e)))?;

        let mut settings = Settings::load(&root, cli.config.as_deref())?;
        if let Some(secs) = cli.timeout {
            settings.timeout_secs = secs;
        }

        let examples = extract_examples(&root.join(&settings.docs_dir))?;
        let examples = select(examples, cli.example.as_deref())?;
        Ok(Self { root, settings, examples })
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Keep the examples matching `--example NAME [LANG]`.
pub fn select(examples: Vec<Example>, filter: Option<&[String]>) -> Result<Vec<Example>, CliError> {
    let (name, language) = match filter {
        None => return Ok(examples),
        Some([name]) => (name, None),
        Some([name, lang]) => {
            let language = lang.parse::<Language>().map_err(CliError::Usage)?;
            (name, Some(language))
        }
        Some(_) => return Err(CliError::Usage("--example takes NAME and an optional LANG".into())),
    };

    let selected: Vec<Example> = examples
        .into_iter()
        .filter(|e| &e.name == name && language.map_or(true, |l| e.language == l))
        .collect();
    if selected.is_empty() {
        let what = match language {
            Some(l) => format!("{} ({})", name, l),
            None => name.clone(),
        };
        return Err(CliError::Usage(format!("no example named {}", what)));
    }
    Ok(selected)
}
