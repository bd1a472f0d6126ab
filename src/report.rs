//! Plain-text rendering of per-module reports.

/// Symbols of one module found absent from the reference docs.
#[derive(Debug, PartialEq, Eq)]
pub struct MissingReport {
    pub module: String,
    /// Sorted, deduplicated.
    pub missing: Vec<String>,
}

/// Column limit for report lines.
pub const WRAP_WIDTH: usize = 79;

/// Heading printed before the first report line.
pub const HEADING: &str = "Public symbols missing from the reference docs:";

impl MissingReport {
    /// One bulleted, word-wrapped line:
    /// `* **module** (count): `a`, `b``.
    pub fn render(&self, width: usize) -> String {
        let symbols = self
            .missing
            .iter()
            .map(|s| format!("`{s}`"))
            .collect::<Vec<_>>()
            .join(", ");
        let line = format!(
            "* **{}** ({}): {}",
            self.module,
            self.missing.len(),
            symbols
        );
        wrap(&line, width, "  ")
    }
}

/// Greedy word wrap with a hanging indent for continuation lines.
fn wrap(text: &str, width: usize, indent: &str) -> String {
    let mut out = String::new();
    let mut line_len = 0usize;
    for (i, word) in text.split_whitespace().enumerate() {
        if i == 0 {
            out.push_str(word);
            line_len = word.len();
        } else if line_len + 1 + word.len() > width {
            out.push('\n');
            out.push_str(indent);
            out.push_str(word);
            line_len = indent.len() + word.len();
        } else {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + word.len();
        }
    }
    out
}
