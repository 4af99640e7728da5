// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `docex.toml` settings.
//!
//! Every key is optional. Relative paths are resolved against the
//! repository root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "docex.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Documentation tree scanned for examples
    pub docs_dir: PathBuf,
    pub frames_dir: PathBuf,
    /// Reference transcripts
    pub outputs_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Searched in order for asset dependency tokens
    pub asset_roots: Vec<PathBuf>,
    /// Per-command limit
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("site"),
            frames_dir: PathBuf::from("tests/example-frames"),
            outputs_dir: PathBuf::from("tests/example-outputs"),
            build_dir: PathBuf::from("build"),
            asset_roots: docex_project::deps::DEFAULT_ASSET_ROOTS.iter().map(PathBuf::from).collect(),
            timeout_secs: 600,
        }
    }
}

impl Settings {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load `explicit` if given, otherwise `<root>/docex.toml` when it exists,
    /// otherwise the defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_toml_str(
            r#"
docs_dir = "docs"
asset_roots = ["assets", "static/models"]
timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(settings.docs_dir, PathBuf::from("docs"));
        assert_eq!(settings.asset_roots.len(), 2);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.frames_dir, PathBuf::from("tests/example-frames"));
    }

    #[test]
    fn test_load_missing_default_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path(), None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path(), Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "timeout_secs = \"soon\"").unwrap();
        let err = Settings::load(dir.path(), None).unwrap_err();
        assert!(err.to_string().starts_with("invalid "));
    }
}
