// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Turn a merged example into a standalone project on disk.
//!
//! Everything that can fail on bad input (crate versions, dependency tokens)
//! is resolved before the project root is touched.

use std::fs;
use std::path::{Path, PathBuf};

use docex_core::{check_example_name, Example, ExampleKey, Language};
use tracing::debug;

use crate::context::ProjectContext;
use crate::deps::{resolve_dependency, ResolvedFile};
use crate::error::{ProjectError, Result};
use crate::manifest::CargoManifest;

/// Name of the generated build/run script.
pub const SCRIPT_NAME: &str = "build_and_run.sh";
const SCRIPT_HEADER: &str = "#!/usr/bin/env bash";

/// A file generated from the example, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// A materialized project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub key: ExampleKey,
    /// Build root holding the pristine sources
    pub path: PathBuf,
    /// Isolated execution root, populated by the runner
    pub run_path: PathBuf,
    /// Where the captured output is written
    pub transcript: PathBuf,
    /// Written files, relative to `path`
    pub files: Vec<PathBuf>,
    /// Commands in execution order
    pub setup_lines: Vec<String>,
}

/// Per-language project generation.
pub trait Materializer: Sync {
    /// Conventional source file, relative to the project root.
    fn source_file(&self) -> &'static str;

    /// Language-specific files besides the source (manifests).
    fn extra_files(&self, _example: &Example, _ctx: &ProjectContext) -> Result<Vec<GeneratedFile>> {
        Ok(Vec::new())
    }

    /// Write the project for `example` into a cleared project root.
    fn materialize(&self, example: &Example, ctx: &ProjectContext) -> Result<ProjectLayout> {
        let key = example.key();
        if let Err(reason) = check_example_name(&key.name) {
            return Err(ProjectError::InvalidName { key, reason });
        }

        let mut generated = vec![GeneratedFile {
            path: PathBuf::from(self.source_file()),
            contents: join_lines(&example.lines),
        }];
        generated.extend(self.extra_files(example, ctx)?);
        generated.push(GeneratedFile {
            path: PathBuf::from(SCRIPT_NAME),
            contents: script_contents(&example.setup_lines),
        });

        let mut copies: Vec<ResolvedFile> = Vec::new();
        for token in &example.dependencies {
            copies.extend(resolve_dependency(&key, token, ctx)?);
        }

        let root = ctx.project_root(&key);
        recreate_dir(&root)?;
        debug!(example = %key, root = %root.display(), "materializing project");

        let mut files = Vec::new();
        for copy in &copies {
            let dest = root.join(&copy.dest);
            fs::copy(&copy.source, &dest).map_err(|e| ProjectError::io(&copy.source, e))?;
            files.push(copy.dest.clone());
        }
        for file in &generated {
            write_file(&root.join(&file.path), &file.contents)?;
            files.push(file.path.clone());
        }
        make_executable(&root.join(SCRIPT_NAME))?;

        Ok(ProjectLayout {
            run_path: ctx.run_root(&key),
            transcript: ctx.transcript_path(&key),
            path: root,
            key,
            files,
            setup_lines: example.setup_lines.clone(),
        })
    }
}

/// C and C++: a single source file next to the copied library sources.
pub struct NativeProject {
    source: &'static str,
}

/// Rust: `src/main.rs` plus a synthesized `Cargo.toml`.
pub struct CargoProject;

impl Materializer for NativeProject {
    fn source_file(&self) -> &'static str {
        self.source
    }
}

impl Materializer for CargoProject {
    fn source_file(&self) -> &'static str {
        "src/main.rs"
    }

    fn extra_files(&self, example: &Example, ctx: &ProjectContext) -> Result<Vec<GeneratedFile>> {
        let manifest = CargoManifest::for_example(example, ctx)?;
        Ok(vec![GeneratedFile {
            path: PathBuf::from("Cargo.toml"),
            contents: manifest.to_toml()?,
        }])
    }
}

static C_PROJECT: NativeProject = NativeProject { source: "main.c" };
static CPP_PROJECT: NativeProject = NativeProject { source: "main.cpp" };
static CARGO_PROJECT: CargoProject = CargoProject;

/// The materializer for a language.
pub fn materializer(language: Language) -> &'static dyn Materializer {
    match language {
        Language::C => &C_PROJECT,
        Language::Cpp => &CPP_PROJECT,
        Language::Rust => &CARGO_PROJECT,
    }
}

/// Materialize `example` with its language's materializer.
pub fn materialize(example: &Example, ctx: &ProjectContext) -> Result<ProjectLayout> {
    materializer(example.language).materialize(example, ctx)
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn script_contents(setup_lines: &[String]) -> String {
    let mut out = String::from(SCRIPT_HEADER);
    out.push('\n');
    out.push_str(&join_lines(setup_lines));
    out
}

/// Remove `dir` if present and create it empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| ProjectError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| ProjectError::io(dir, e))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProjectError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ProjectError::io(path, e))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| ProjectError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docex_core::{merge, SourceLocation};

    fn merged(name: &str, language: Language, lines: &[&str]) -> Example {
        let ex = Example::new(
            name.into(),
            language,
            vec![],
            lines.iter().map(|s| s.to_string()).collect(),
            SourceLocation { path: PathBuf::from("doc.md"), line: 1 },
        );
        merge(ex, None).unwrap()
    }

    /// Repository root with a fake library bundle and one asset.
    fn fixture_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let viewer = dir.path().join("native/viewer");
        fs::create_dir_all(&viewer).unwrap();
        fs::write(viewer.join("ufbx.c"), "/* ufbx.c */\n").unwrap();
        fs::write(viewer.join("ufbx.h"), "/* ufbx.h */\n").unwrap();
        let models = dir.path().join("static/models");
        fs::create_dir_all(&models).unwrap();
        fs::write(models.join("cube.fbx"), "cube").unwrap();
        dir
    }

    #[test]
    fn test_materialize_c_defaults() {
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let example = merged("hello", Language::C, &["int main(){return 0;}"]);

        let layout = materialize(&example, &ctx).unwrap();
        assert_eq!(layout.path, repo.path().join("build/examples/c/hello"));

        let source = fs::read_to_string(layout.path.join("main.c")).unwrap();
        assert_eq!(source, "int main(){return 0;}\n");

        let script = fs::read_to_string(layout.path.join(SCRIPT_NAME)).unwrap();
        assert_eq!(
            script,
            "#!/usr/bin/env bash\nclang ufbx.c main.c -lm -o example\n./example\n"
        );
        assert!(layout.path.join("ufbx.c").is_file());
        assert!(layout.path.join("ufbx.h").is_file());
        assert_eq!(layout.setup_lines, example.setup_lines);
    }

    #[test]
    fn test_materialize_rust_project() {
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let mut example = merged("meshes/draw", Language::Rust, &["fn main() {}"]);
        example.dependencies.push("cube.fbx".into());
        example.crates.insert("glam".into());

        let layout = materialize(&example, &ctx).unwrap();
        assert!(layout.path.join("src/main.rs").is_file());
        assert!(layout.path.join("cube.fbx").is_file());
        let manifest = fs::read_to_string(layout.path.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"draw\""));
        assert!(manifest.contains("glam = \"0.29\""));
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let mut example = merged("again", Language::Rust, &["fn main() {", "}"]);
        example.crates.insert("mint".into());

        let read_all = |layout: &ProjectLayout| -> Vec<(PathBuf, Vec<u8>)> {
            layout
                .files
                .iter()
                .map(|f| (f.clone(), fs::read(layout.path.join(f)).unwrap()))
                .collect()
        };

        let first = read_all(&materialize(&example, &ctx).unwrap());
        let second = read_all(&materialize(&example, &ctx).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_crate_writes_nothing() {
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let mut example = merged("bad", Language::Rust, &["fn main() {}"]);
        example.crates.insert("not-a-crate".into());

        let err = materialize(&example, &ctx).unwrap_err();
        assert!(matches!(err, ProjectError::UnresolvableCrate { .. }));
        assert!(!ctx.project_root(&example.key()).exists());
    }

    #[test]
    fn test_unresolvable_dependency_writes_nothing() {
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let mut example = merged("bad", Language::Cpp, &[]);
        example.dependencies.push("nowhere.fbx".into());

        let err = materialize(&example, &ctx).unwrap_err();
        assert!(matches!(err, ProjectError::UnresolvableDependency { .. }));
        assert!(!ctx.project_root(&example.key()).exists());
    }

    #[test]
    fn test_name_cannot_escape_build_dir() {
        let repo = fixture_repo();
        let precious = repo.path().join("precious");
        fs::create_dir_all(&precious).unwrap();
        fs::write(precious.join("keep.txt"), "keep").unwrap();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        fs::create_dir_all(repo.path().join("build/examples/c")).unwrap();

        let example = merged("../../../precious", Language::C, &["int x;"]);
        let err = materialize(&example, &ctx).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidName { .. }));
        assert!(precious.join("keep.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let repo = fixture_repo();
        let ctx = ProjectContext::new(repo.path(), repo.path().join("build"));
        let layout = materialize(&merged("exe", Language::Cpp, &[]), &ctx).unwrap();
        let mode = fs::metadata(layout.path.join(SCRIPT_NAME)).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
