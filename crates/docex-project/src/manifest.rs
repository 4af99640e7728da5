// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `Cargo.toml` synthesis for Rust examples.

use std::collections::BTreeMap;

use docex_core::Example;
use serde::Serialize;

use crate::context::ProjectContext;
use crate::deps::{crate_version, LIBRARY_CRATE, LIBRARY_VERSION};
use crate::error::{ProjectError, Result};

const PACKAGE_VERSION: &str = "0.1.0";
const EDITION: &str = "2021";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CargoManifest {
    pub package: Package,
    /// Ordered by crate name so output is stable.
    pub dependencies: BTreeMap<String, DependencySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub edition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Version(String),
    Path { path: String },
}

impl CargoManifest {
    /// Build the manifest for a merged example.
    ///
    /// Fails on the first `$crate` token without a registered version.
    pub fn for_example(example: &Example, ctx: &ProjectContext) -> Result<Self> {
        let mut dependencies = BTreeMap::new();

        let library = match &ctx.library_override {
            Some(path) => DependencySpec::Path {
                path: path.to_string_lossy().replace('\\', "/"),
            },
            None => DependencySpec::Version(LIBRARY_VERSION.to_string()),
        };
        dependencies.insert(LIBRARY_CRATE.to_string(), library);

        for token in &example.crates {
            let version = crate_version(token).ok_or_else(|| ProjectError::UnresolvableCrate {
                key: example.key(),
                token: token.clone(),
            })?;
            dependencies.insert(token.clone(), DependencySpec::Version(version.to_string()));
        }

        Ok(CargoManifest {
            package: Package {
                name: example.short_name().to_string(),
                version: PACKAGE_VERSION.to_string(),
                edition: EDITION.to_string(),
            },
            dependencies,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
