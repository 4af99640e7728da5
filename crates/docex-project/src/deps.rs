// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Dependency bundles, asset lookup and crate versions.
//!
//! `$dep` tokens name either a bundle of library files or an asset file
//! (possibly a glob such as `units_*.fbx`) found in one of the asset roots.

use std::path::{Path, PathBuf};

use docex_core::ExampleKey;

use crate::context::ProjectContext;
use crate::error::{ProjectError, Result};

/// One file of a dependency bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleFile {
    /// File name inside the project root
    pub dest: &'static str,
    /// Path relative to the repository root
    pub source: &'static str,
}

const fn file(dest: &'static str, source: &'static str) -> BundleFile {
    BundleFile { dest, source }
}

/// Known dependency bundles.
pub const BUNDLES: &[(&str, &[BundleFile])] = &[
    (
        "ufbx",
        &[
            file("ufbx.c", "native/viewer/ufbx.c"),
            file("ufbx.h", "native/viewer/ufbx.h"),
        ],
    ),
    ("example_math", &[file("example_math.h", "native/example/example_math.h")]),
    ("example_base", &[file("example_base.h", "native/example/example_base.h")]),
];

/// Third-party crates available to `$crate`.
pub const CRATE_VERSIONS: &[(&str, &str)] = &[("glam", "0.29"), ("mint", "0.5")];

/// Crate name of the library under test.
pub const LIBRARY_CRATE: &str = "ufbx";
/// Released version used when no local override is given.
pub const LIBRARY_VERSION: &str = "0.8";

/// Asset directories searched for non-bundle tokens, relative to the repository root.
pub const DEFAULT_ASSET_ROOTS: &[&str] = &["static/models"];

pub fn bundle(token: &str) -> Option<&'static [BundleFile]> {
    BUNDLES.iter().find(|(name, _)| *name == token).map(|(_, files)| *files)
}

pub fn crate_version(token: &str) -> Option<&'static str> {
    CRATE_VERSIONS.iter().find(|(name, _)| *name == token).map(|(_, v)| *v)
}

/// A file to copy into the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub dest: PathBuf,
    pub source: PathBuf,
}

/// Resolve a `$dep` token to the files it provides.
pub fn resolve_dependency(key: &ExampleKey, token: &str, ctx: &ProjectContext) -> Result<Vec<ResolvedFile>> {
    if let Some(files) = bundle(token) {
        return Ok(files
            .iter()
            .map(|f| ResolvedFile {
                dest: PathBuf::from(f.dest),
                source: ctx.repo_root.join(f.source),
            })
            .collect());
    }

    for root in &ctx.asset_roots {
        let matches = find_assets(key, root, token)?;
        if !matches.is_empty() {
            return Ok(matches);
        }
    }

    Err(ProjectError::UnresolvableDependency {
        key: key.clone(),
        token: token.to_string(),
        searched: ctx.asset_roots.clone(),
    })
}

fn find_assets(key: &ExampleKey, root: &Path, token: &str) -> Result<Vec<ResolvedFile>> {
    let pattern = format!("{}/{}", glob::Pattern::escape(&root.to_string_lossy()), token);
    let paths = glob::glob(&pattern).map_err(|e| ProjectError::InvalidPattern {
        key: key.clone(),
        token: token.to_string(),
        message: e.to_string(),
    })?;

    let mut found: Vec<ResolvedFile> = paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let dest = PathBuf::from(path.file_name()?);
            Some(ResolvedFile { dest, source: path })
        })
        .collect();
    found.sort_by(|a, b| a.dest.cmp(&b.dest));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docex_core::Language;
    use std::fs;

    fn key() -> ExampleKey {
        ExampleKey { name: "ex".into(), language: Language::Cpp }
    }

    #[test]
    fn test_tables() {
        assert_eq!(bundle("ufbx").map(|f| f.len()), Some(2));
        assert!(bundle("light.fbx").is_none());
        assert_eq!(crate_version("glam"), Some("0.29"));
        assert_eq!(crate_version("serde"), None);
    }

    #[test]
    fn test_resolve_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::new(dir.path(), dir.path().join("build"));
        let files = resolve_dependency(&key(), "example_math", &ctx).unwrap();
        assert_eq!(
            files,
            vec![ResolvedFile {
                dest: PathBuf::from("example_math.h"),
                source: dir.path().join("native/example/example_math.h"),
            }]
        );
    }

    #[test]
    fn test_resolve_assets_and_globs() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("models");
        let second = dir.path().join("extra");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("cube.fbx"), "a").unwrap();
        fs::write(second.join("cube.fbx"), "b").unwrap();
        fs::write(second.join("units_cm.fbx"), "").unwrap();
        fs::write(second.join("units_m.fbx"), "").unwrap();

        let mut ctx = ProjectContext::new(dir.path(), dir.path().join("build"));
        ctx.asset_roots = vec![first.clone(), second.clone()];

        let cube = resolve_dependency(&key(), "cube.fbx", &ctx).unwrap();
        assert_eq!(cube.len(), 1);
        assert_eq!(cube[0].source, first.join("cube.fbx"));

        let units = resolve_dependency(&key(), "units_*.fbx", &ctx).unwrap();
        let names: Vec<_> = units.iter().map(|f| f.dest.to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["units_cm.fbx", "units_m.fbx"]);
    }

    #[test]
    fn test_unresolvable_dependency() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::new(dir.path(), dir.path().join("build"));
        let err = resolve_dependency(&key(), "missing.fbx", &ctx).unwrap_err();
        assert!(matches!(err, ProjectError::UnresolvableDependency { ref token, .. } if token == "missing.fbx"));
    }
}
