// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Standalone projects for merged examples.
//!
//! Each example becomes a directory that builds and runs on its own:
//! the merged source, the copied dependency files, a `build_and_run.sh`
//! with the frame's command sequence and, for Rust, a `Cargo.toml`.

pub mod context;
pub mod deps;
pub mod error;
pub mod manifest;
pub mod materialize;

pub use context::ProjectContext;
pub use error::{ProjectError, Result};
pub use manifest::{CargoManifest, DependencySpec};
pub use materialize::{materialize, materializer, recreate_dir, Materializer, ProjectLayout, SCRIPT_NAME};
