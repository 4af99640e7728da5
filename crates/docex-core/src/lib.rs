// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runnable examples embedded in documentation.
//!
//! Scans markdown for fenced code blocks tagged with an example-name
//! directive and merges each snippet into its optional frame template:
//!
//! ````markdown
//! ```c
//! // ufbx-doc-example: meshes/mesh-parts
//! void convert_mesh_part(ufbx_mesh *mesh, ufbx_mesh_part *part) { ... }
//! ```
//! ````
//!
//! Fences without a directive are ordinary documentation and are ignored.
//!
//! ## Frame directives
//!
//! - `$dep <tok>...` - copy dependency bundles or asset files into the project
//! - `$crate <tok>...` - add third-party crates to the generated manifest
//! - `$ <command>` - append a build/run command
//!
//! The frame body must contain one line with `EXAMPLE_SOURCE`; it is replaced
//! by the snippet, indented like the placeholder line.

pub mod directive;
pub mod error;
pub mod example;
pub mod extract;
pub mod frame;

pub use directive::{parse_blocks, Block, DirectiveParser, SENTINEL};
pub use error::{Error, Result};
pub use example::{Example, ExampleKey, Language, SourceLocation};
pub use extract::{check_example_name, collect_documents, extract_document, extract_examples};
pub use frame::{classify_meta_line, frame_path, merge, merge_from_dir, Directive, Frame, PLACEHOLDER};
