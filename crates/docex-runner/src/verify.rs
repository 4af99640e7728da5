// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Line-by-line comparison against a reference transcript.

use std::fmt;

/// First line where captured output and reference disagree.
/// `None` means the side ran out of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-indexed
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: expected {}, got {}",
            self.line,
            describe(self.expected.as_deref()),
            describe(self.actual.as_deref())
        )
    }
}

fn describe(line: Option<&str>) -> String {
    match line {
        Some(text) => format!("{:?}", text),
        None => "<end of output>".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Mismatch(Mismatch),
}

/// Compare `actual` against `expected` position by position.
/// Stops at the first difference.
pub fn verify(expected: &str, actual: &str) -> Verdict {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    let len = expected.len().max(actual.len());

    for i in 0..len {
        let want = expected.get(i).copied();
        let got = actual.get(i).copied();
        if want != got {
            return Verdict::Mismatch(Mismatch {
                line: i + 1,
                expected: want.map(String::from),
                actual: got.map(String::from),
            });
        }
    }
    Verdict::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_passes() {
        assert_eq!(verify("a\nb\nc\n", "a\nb\nc\n"), Verdict::Pass);
        assert_eq!(verify("", ""), Verdict::Pass);
        // Trailing newline and CRLF differences are not content.
        assert_eq!(verify("a\nb", "a\r\nb\r\n"), Verdict::Pass);
    }

    #[test]
    fn test_reports_first_divergence() {
        let verdict = verify("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            verdict,
            Verdict::Mismatch(Mismatch {
                line: 2,
                expected: Some("b".into()),
                actual: Some("x".into()),
            })
        );
    }

    #[test]
    fn test_missing_trailing_lines_fail() {
        let verdict = verify("a\nb\n\n", "a\nb\n");
        assert_eq!(
            verdict,
            Verdict::Mismatch(Mismatch { line: 3, expected: Some(String::new()), actual: None })
        );
    }

    #[test]
    fn test_extra_output_fails() {
        match verify("a\n", "a\nextra\n") {
            Verdict::Mismatch(m) => {
                assert_eq!(m.line, 2);
                assert_eq!(m.to_string(), "line 2: expected <end of output>, got \"extra\"");
            }
            Verdict::Pass => panic!("extra output must not pass"),
        }
    }
}
