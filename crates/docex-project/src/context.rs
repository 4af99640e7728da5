// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Where projects are written and where their inputs come from.

use std::path::{Path, PathBuf};

use docex_core::ExampleKey;

use crate::deps::DEFAULT_ASSET_ROOTS;

/// Shared inputs for materializing every example of one sweep.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Repository root; bundle sources are relative to it.
    pub repo_root: PathBuf,
    /// Build roots live in `<build_dir>/examples`, execution roots in `<build_dir>/runs`.
    pub build_dir: PathBuf,
    /// Searched in order for asset dependencies.
    pub asset_roots: Vec<PathBuf>,
    /// Local checkout of the library under test, replacing the released version.
    pub library_override: Option<PathBuf>,
}

impl ProjectContext {
    pub fn new(repo_root: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let asset_roots = DEFAULT_ASSET_ROOTS.iter().map(|r| repo_root.join(r)).collect();
        Self {
            repo_root,
            build_dir: build_dir.into(),
            asset_roots,
            library_override: None,
        }
    }

    /// `<build_dir>/examples/<lang>/<name>`
    pub fn project_root(&self, key: &ExampleKey) -> PathBuf {
        keyed_dir(&self.build_dir.join("examples"), key)
    }

    /// `<build_dir>/runs/<lang>/<name>`
    pub fn run_root(&self, key: &ExampleKey) -> PathBuf {
        keyed_dir(&self.build_dir.join("runs"), key)
    }

    /// `<build_dir>/runs/<lang>/<name>.txt`, next to the execution root.
    pub fn transcript_path(&self, key: &ExampleKey) -> PathBuf {
        keyed_dir(&self.build_dir.join("runs"), &ExampleKey {
            name: format!("{}.txt", key.name),
            language: key.language,
        })
    }
}

fn keyed_dir(base: &Path, key: &ExampleKey) -> PathBuf {
    let mut dir = base.join(key.language.tag());
    for segment in key.name.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}
