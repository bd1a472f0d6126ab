//! Module discovery from the generated library index page.
//!
//! The docs preview server renders `lib-index.html` with one anchor per
//! documented module:
//!
//! ```text
//! <td><a href="string.html#library-string"><code>string</code></a></td>
//! ```
//!
//! This is a best-effort line scan of that semi-structured markup, not a
//! parser. Lines that do not look like a module entry are skipped without
//! error; the filters below keep aliases and private modules out. The rest
//! of the tool only ever sees the resulting module list.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Index page served by the docs preview server.
pub const INDEX_PAGE: &str = "lib-index.html";

/// Anchor fragment prefix marking a module index entry.
const ANCHOR_MARKER: &str = "#library-";

/// Fixed delimiter between the href and the displayed module name.
const ENTRY_DELIMITER: &str = "\"><code>";

/// Overall timeout for the index fetch; the only network call in a run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

static RE_HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]+)$"#).unwrap());

/// Fetch the raw library index markup from the preview server.
///
/// Single attempt, no retries: an unreachable server is fatal for
/// discovery.
pub fn fetch_index(base_url: &str) -> Result<String> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), INDEX_PAGE);
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    agent
        .get(&url)
        .call()
        .with_context(|| format!("failed to fetch module index: {url}"))?
        .into_string()
        .with_context(|| format!("failed to read module index body: {url}"))
}

/// Extract the set of module names that have their own reference page.
///
/// Returns first-seen order, deduplicated, so the default report follows
/// the index's own order. A candidate survives only when its displayed name
/// is public (no `_` prefix) and matches the stem of the page its href
/// points at — index entries for aliases, submodule anchors, and
/// cross-references fail that check.
pub fn discover(markup: &str, doc_base: &Path) -> Vec<String> {
    let mut modules: Vec<String> = Vec::new();
    for line in markup.lines() {
        if !line.contains(ANCHOR_MARKER) {
            continue;
        }
        let Some((pre, post)) = line.split_once(ENTRY_DELIMITER) else {
            continue;
        };
        let Some(href) = RE_HREF.captures(pre).map(|caps| caps[1].to_string()) else {
            continue;
        };
        let Some(name) = post.split_once("</code>").map(|(name, _)| name.trim()) else {
            continue;
        };

        // Referenced page: fragment stripped, rewritten to the doc source
        // extension, rooted at the doc tree.
        let page = href.split('#').next().unwrap_or(&href);
        let Some(page) = page.strip_suffix(".html") else {
            continue;
        };
        let source_page = doc_base.join(format!("{page}.mdx"));
        let Some(stem) = source_page.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if name.is_empty() || name.starts_with('_') || stem != name {
            continue;
        }
        if !modules.iter().any(|m| m == name) {
            modules.push(name.to_string());
        }
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(href: &str, name: &str) -> String {
        format!(r#"<td><a href="{href}"><code>{name}</code></a></td>"#)
    }

    #[test]
    fn single_entry_discovered() {
        let markup = entry("os.html#library-os", "os");
        assert_eq!(discover(&markup, Path::new("Doc")), vec!["os"]);
    }

    #[test]
    fn lines_without_marker_skipped() {
        let markup = "<td><a href=\"os.html\"><code>os</code></a></td>\n<p>#library- mentioned in prose without an entry</p>";
        assert!(discover(markup, Path::new("Doc")).is_empty());
    }

    #[test]
    fn private_modules_skipped() {
        let markup = entry("_bootstrap.html#library-_bootstrap", "_bootstrap");
        assert!(discover(&markup, Path::new("Doc")).is_empty());
    }

    #[test]
    fn alias_entries_skipped() {
        // Displayed name disagrees with the page stem: an alias, not the
        // module's own page.
        let markup = entry("os.html#library-environ", "environ");
        assert!(discover(&markup, Path::new("Doc")).is_empty());
    }

    #[test]
    fn non_page_hrefs_skipped() {
        let markup = entry("os/#library-os", "os");
        assert!(discover(&markup, Path::new("Doc")).is_empty());
    }

    #[test]
    fn malformed_entry_without_display_name_skipped() {
        let markup = r#"<td><a href="os.html#library-os"><code>os</a></td>"#;
        assert!(discover(markup, Path::new("Doc")).is_empty());
    }

    #[test]
    fn fragment_stripped_before_stem_check() {
        let markup = entry("string.html#library-string", "string");
        assert_eq!(discover(&markup, Path::new("docs")), vec!["string"]);
    }

    #[test]
    fn nested_page_path_uses_stem() {
        let markup = entry("text/string.html#library-string", "string");
        assert_eq!(discover(&markup, Path::new("docs")), vec!["string"]);
    }

    #[test]
    fn duplicates_collapse_and_order_is_first_seen() {
        let markup = [
            entry("string.html#library-string", "string"),
            entry("os.html#library-os", "os"),
            entry("string.html#library-string", "string"),
        ]
        .join("\n");
        assert_eq!(discover(&markup, Path::new("docs")), vec!["string", "os"]);
    }
}
