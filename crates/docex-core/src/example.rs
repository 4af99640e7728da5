// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The example record and the closed set of target languages.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A target language. Variant order is the processing order within a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    C,
    Cpp,
    Rust,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::C, Language::Cpp, Language::Rust];

    /// Parse a fence tag (`c`, `cpp`, `rust`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "c" => Some(Language::C),
            "cpp" => Some(Language::Cpp),
            "rust" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        }
    }

    /// Extension of frame template files for this language.
    pub fn frame_extension(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rs",
        }
    }

    /// Dependency tokens requested when a frame declares no directives.
    pub fn default_dependencies(self) -> &'static [&'static str] {
        match self {
            Language::C | Language::Cpp => &["ufbx"],
            Language::Rust => &[],
        }
    }

    /// Build/run sequence used when a frame declares no directives.
    pub fn default_setup(self) -> &'static [&'static str] {
        match self {
            Language::C => &["clang ufbx.c main.c -lm -o example", "./example"],
            Language::Cpp => &["clang++ ufbx.c main.cpp -lm -o example", "./example"],
            Language::Rust => &["cargo build", "cargo run --quiet"],
        }
    }

    /// Command that checks the toolchain is installed.
    pub fn version_probe(self) -> &'static str {
        match self {
            Language::C => "clang --version",
            Language::Cpp => "clang++ --version",
            Language::Rust => "cargo --version",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| {
            let known: Vec<_> = Language::ALL.iter().map(|l| l.tag()).collect();
            format!("unknown language `{}` (expected one of: {})", s, known.join(", "))
        })
    }
}

/// Where an example was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// 1-indexed line of the opening fence
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// Identity of an example across the whole documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExampleKey {
    pub name: String,
    pub language: Language,
}

impl fmt::Display for ExampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.language)
    }
}

/// A runnable snippet extracted from documentation.
///
/// Fresh from extraction, `lines` is the snippet body and the setup fields
/// are empty. After [`crate::merge`] `lines` is the whole program and the
/// setup fields reflect the frame's meta directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// May contain `/` to group examples into directories.
    pub name: String,
    pub language: Language,
    /// Tokens after the name in the directive. Reserved.
    pub flags: Vec<String>,
    pub lines: Vec<String>,
    /// Build/run commands in execution order.
    pub setup_lines: Vec<String>,
    /// `$dep` tokens in declaration order, without repeats.
    pub dependencies: Vec<String>,
    /// `$crate` tokens.
    pub crates: BTreeSet<String>,
    pub location: SourceLocation,
}

impl Example {
    pub fn new(name: String, language: Language, flags: Vec<String>, lines: Vec<String>, location: SourceLocation) -> Self {
        Self {
            name,
            language,
            flags,
            lines,
            setup_lines: Vec::new(),
            dependencies: Vec::new(),
            crates: BTreeSet::new(),
            location,
        }
    }

    pub fn key(&self) -> ExampleKey {
        ExampleKey {
            name: self.name.clone(),
            language: self.language,
        }
    }

    /// Last `/`-separated segment of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}
