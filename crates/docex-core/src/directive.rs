// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Line scanner for example blocks in markdown.
//!
//! An example is a fenced block whose content carries a name directive:
//! ````text
//! ```cpp
//! // ufbx-doc-example: nodes/space-conversion
//! ...
//! ```
//! ````
//! Nested fences are not supported.

/// Keyword marking a comment line as an example-name directive.
pub const SENTINEL: &str = "ufbx-doc-example";

/// A completed example block, before its language tag is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub tag: String,
    pub flags: Vec<String>,
    pub lines: Vec<String>,
    /// 1-indexed line of the opening fence
    pub line: usize,
}

/// What a single markdown line means to the scanner.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    FenceOpen(&'a str),
    FenceClose,
    /// Tokens after `ufbx-doc-example:`, possibly empty
    Name(Vec<&'a str>),
    Text,
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        return if tag_len > 0 {
            LineKind::FenceOpen(&rest[..tag_len])
        } else {
            LineKind::FenceClose
        };
    }

    match parse_name_directive(trimmed) {
        Some(tokens) => LineKind::Name(tokens),
        None => LineKind::Text,
    }
}

/// `// ufbx-doc-example: name flag` or `# ufbx-doc-example: name` → tokens.
fn parse_name_directive(trimmed: &str) -> Option<Vec<&str>> {
    let comment = trimmed
        .strip_prefix("//")
        .or_else(|| trimmed.strip_prefix('#'))?;
    let tokens = comment
        .trim_start()
        .strip_prefix(SENTINEL)?
        .trim_start()
        .strip_prefix(':')?;
    Some(tokens.split_whitespace().collect())
}

#[derive(Debug)]
enum State {
    Outside,
    InFence { tag: String, line: usize },
}

/// Stateful scanner fed one line at a time.
#[derive(Debug)]
pub struct DirectiveParser {
    state: State,
    name: Option<String>,
    flags: Vec<String>,
    lines: Vec<String>,
    line_no: usize,
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveParser {
    pub fn new() -> Self {
        Self {
            state: State::Outside,
            name: None,
            flags: Vec::new(),
            lines: Vec::new(),
            line_no: 0,
        }
    }

    /// Feed the next line. Returns a block when a named fence closes.
    pub fn feed(&mut self, line: &str) -> Option<Block> {
        self.line_no += 1;

        match classify(line) {
            LineKind::FenceOpen(tag) => {
                self.reset();
                self.state = State::InFence {
                    tag: tag.to_string(),
                    line: self.line_no,
                };
                None
            }
            LineKind::FenceClose => {
                let state = std::mem::replace(&mut self.state, State::Outside);
                let name = self.name.take();
                let flags = std::mem::take(&mut self.flags);
                let lines = std::mem::take(&mut self.lines);
                match (state, name) {
                    (State::InFence { tag, line }, Some(name)) => Some(Block { name, tag, flags, lines, line }),
                    _ => None,
                }
            }
            LineKind::Name(tokens) => {
                if matches!(self.state, State::InFence { .. }) {
                    if let Some((first, rest)) = tokens.split_first() {
                        self.name = Some(first.to_string());
                        self.flags = rest.iter().map(|t| t.to_string()).collect();
                    }
                }
                None
            }
            LineKind::Text => {
                if matches!(self.state, State::InFence { .. }) {
                    self.lines.push(line.trim_end().to_string());
                }
                None
            }
        }
    }

    fn reset(&mut self) {
        self.state = State::Outside;
        self.name = None;
        self.flags.clear();
        self.lines.clear();
    }
}

/// Scan a whole document and return its example blocks in order.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut parser = DirectiveParser::new();
    text.lines().filter_map(|line| parser.feed(line)).collect()
}
