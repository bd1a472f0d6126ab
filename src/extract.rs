//! Public symbol extraction from library modules.
//!
//! A module name like `os` or `os.path` resolves to a source file beneath the
//! library root (`os.sh`, `os/path.sh`). Symbols are the module's top-level
//! function and variable names, scanned line by line with brace-depth
//! tracking so function bodies are ignored.
//!
//! A module may declare an explicit export list with `# @export` annotation
//! lines; when present, that list is authoritative for the default extraction
//! mode.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_EXPORT_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*#[ \t]+@export[ \t]+(.+)").unwrap());
static RE_FUNC_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:function[ \t]+)?([A-Za-z_][A-Za-z0-9_:]*)[ \t]*\([ \t]*\)").unwrap()
});
static RE_FUNC_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*function[ \t]+([A-Za-z_][A-Za-z0-9_:]*)[ \t]*\{?").unwrap()
});
static RE_DECLARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:declare|readonly|export)[ \t]+(?:-[A-Za-z]+[ \t]+)*([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
});
static RE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=").unwrap());
static RE_COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*#").unwrap());
static RE_BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*$").unwrap());

/// Resolve a dotted module name to its source file beneath the library root.
///
/// `os` → `<lib_root>/os.sh`, `os.path` → `<lib_root>/os/path.sh`.
/// Returns `None` when the name is malformed or no such file exists — an
/// unresolvable module is skipped, never an error.
pub fn resolve(lib_root: &Path, module: &str) -> Option<PathBuf> {
    if module.is_empty()
        || module
            .split('.')
            .any(|part| part.is_empty() || part.contains(['/', '\\']))
    {
        return None;
    }
    let mut path = lib_root.to_path_buf();
    for part in module.split('.') {
        path.push(part);
    }
    path.set_extension("sh");
    path.is_file().then_some(path)
}

/// Extract a module's public symbol set.
///
/// Default mode (`pattern = None`): the declared `# @export` list when the
/// module has one, else every top-level name not starting with `_`.
///
/// Pattern mode: every top-level name the pattern matches, regardless of the
/// export list and the underscore convention. Used to build computed
/// allow-list entries (see [`prefix_pattern`]).
///
/// An unresolvable or unreadable module yields the empty set.
pub fn extract(lib_root: &Path, module: &str, pattern: Option<&Regex>) -> HashSet<String> {
    let Some(path) = resolve(lib_root, module) else {
        return HashSet::new();
    };
    let Ok(source) = fs::read_to_string(&path) else {
        return HashSet::new();
    };
    let scan = scan_source(&source);

    match pattern {
        Some(re) => scan.names.into_iter().filter(|n| re.is_match(n)).collect(),
        None => match scan.exports {
            Some(exports) => exports.into_iter().collect(),
            None => scan
                .names
                .into_iter()
                .filter(|n| !n.starts_with('_'))
                .collect(),
        },
    }
}

/// The module's declared `# @export` list, verbatim, or `None` when the
/// module is unresolvable or declares no exports.
pub fn declared_exports(lib_root: &Path, module: &str) -> Option<Vec<String>> {
    let path = resolve(lib_root, module)?;
    let source = fs::read_to_string(&path).ok()?;
    scan_source(&source).exports
}

/// Compile a name pattern anchored at the start of the symbol name, so
/// `SQLITE_` matches `SQLITE_OK` but not `MY_SQLITE_OK`.
pub fn prefix_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

struct ScanResult {
    /// Top-level names in source order, deduplicated.
    names: Vec<String>,
    /// Accumulated `# @export` names, if any annotation was present.
    exports: Option<Vec<String>>,
}

/// Scan module source for top-level names and export annotations.
fn scan_source(source: &str) -> ScanResult {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut exports: Option<Vec<String>> = None;
    let mut depth: i32 = 0;

    for line in source.lines() {
        if let Some(caps) = RE_EXPORT_ANNOTATION.captures(line) {
            let list = exports.get_or_insert_with(Vec::new);
            for name in caps[1].split_whitespace() {
                list.push(name.to_string());
            }
            continue;
        }
        if RE_COMMENT_LINE.is_match(line) || RE_BLANK_LINE.is_match(line) {
            continue;
        }

        if depth == 0 {
            for segment in split_outside_quotes(line) {
                let segment = segment.trim_start();
                if let Some(name) = name_from_segment(segment) {
                    if seen.insert(name.clone()) {
                        names.push(name);
                    }
                }
            }
        }
        depth += brace_delta(line);
        if depth < 0 {
            depth = 0;
        }
    }

    ScanResult { names, exports }
}

/// Top-level name declared by one statement segment, if any.
fn name_from_segment(segment: &str) -> Option<String> {
    if let Some(caps) = RE_FUNC_DECL.captures(segment) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = RE_FUNC_KEYWORD.captures(segment) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = RE_DECLARE.captures(segment) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = RE_ASSIGNMENT.captures(segment) {
        return Some(caps[1].to_string());
    }
    None
}

/// Split a line on semicolons outside single and double quotes.
fn split_outside_quotes(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_single = false;
    let mut in_double = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            ';' if !in_single && !in_double => {
                segments.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&line[start..]);
    segments
}

/// Net brace count of a line, ignoring braces inside quotes and after an
/// unquoted comment marker. Function bodies and other `{ … }` blocks push
/// the scanner below top level.
fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut in_single = false;
    let mut in_double = false;
    let mut prev: Option<char> = None;
    for ch in line.chars() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double => {
                // Comment marker only at a word boundary; `${#arr[@]}` is not one.
                if prev.map_or(true, |p| p.is_whitespace()) {
                    break;
                }
            }
            '{' if !in_single && !in_double => delta += 1,
            '}' if !in_single && !in_double => delta -= 1,
            _ => {}
        }
        prev = Some(ch);
    }
    delta
}
