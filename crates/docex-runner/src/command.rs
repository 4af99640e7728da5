// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Setup lines as executable command lines.

use std::fmt;
use std::path::{Path, PathBuf};

/// Token that ends the part of a setup line passed to the child.
/// Output is always captured by the runner; nothing is redirected.
pub const REDIRECT: &str = ">";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split a setup line on whitespace, dropping everything from `>` on.
    /// Returns `None` for lines with no command.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().take_while(|t| *t != REDIRECT);
        let program = tokens.next()?.to_string();
        let args = tokens.map(String::from).collect();
        Some(CommandLine { program, args })
    }

    /// `./example` and `../tool` run from the execution root, not `PATH`.
    pub fn is_relative(&self) -> bool {
        self.program.starts_with("./") || self.program.starts_with("../")
    }

    /// Program to spawn when running inside `root`.
    pub fn program_path(&self, root: &Path) -> PathBuf {
        if self.is_relative() {
            root.join(&self.program)
        } else {
            PathBuf::from(&self.program)
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cmd = CommandLine::parse("  clang ufbx.c main.c -lm -o example ").unwrap();
        assert_eq!(cmd.program, "clang");
        assert_eq!(cmd.args, vec!["ufbx.c", "main.c", "-lm", "-o", "example"]);
        assert!(!cmd.is_relative());
        assert!(CommandLine::parse("   ").is_none());
    }

    #[test]
    fn test_redirect_truncates() {
        let cmd = CommandLine::parse("./example skinned_human.fbx Female > result.obj").unwrap();
        assert_eq!(cmd.to_string(), "./example skinned_human.fbx Female");
        assert!(CommandLine::parse("> out.txt").is_none());
        // Only a standalone `>` counts.
        let cmd = CommandLine::parse("echo a>b").unwrap();
        assert_eq!(cmd.args, vec!["a>b"]);
    }

    #[test]
    fn test_relative_program() {
        let cmd = CommandLine::parse("./example").unwrap();
        assert!(cmd.is_relative());
        assert_eq!(cmd.program_path(Path::new("/run")), Path::new("/run/./example"));
        let cmd = CommandLine::parse("cargo run").unwrap();
        assert_eq!(cmd.program_path(Path::new("/run")), Path::new("cargo"));
    }
}
