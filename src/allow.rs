//! Curated allow-list of known documentation gaps.
//!
//! Per module, either a set of symbols tolerated as undocumented, or the
//! `Ignore` marker meaning the module is not checked at all (its docs live
//! in a different reference system). `Ignore` is a distinct variant — an
//! empty allow set still means "check everything".
//!
//! The table is built once at startup by [`build`] and read-only afterwards.
//! Alongside the static entries it derives a few from the library tree
//! itself, so wrapper modules stay in sync with whatever their underlying
//! module currently declares.

use crate::extract;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

/// sqlite result constants mirrored by the `db` wrapper.
static RE_SQLITE_CONSTANTS: LazyLock<Regex> =
    LazyLock::new(|| extract::prefix_pattern("SQLITE_").unwrap());

/// Color table declared by `ansi` and re-exported by `term`.
static RE_COLOR_CONSTANTS: LazyLock<Regex> =
    LazyLock::new(|| extract::prefix_pattern("COLOR_").unwrap());

/// Allowance for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowance {
    /// Skip the module entirely.
    Ignore,
    /// Tolerate exactly these symbols as undocumented.
    Allow(HashSet<String>),
}

/// Module name → allowance. Absence means no special allowance.
pub type AllowTable = HashMap<String, Allowance>;

fn allowed<const N: usize>(names: [&str; N]) -> Allowance {
    Allowance::Allow(names.iter().map(|s| s.to_string()).collect())
}

/// Build the allow-list table for a library tree.
///
/// Computed entries extract from *other* modules than the one being
/// allow-listed; when a helper module is absent from the tree the entry
/// degrades to an empty set.
pub fn build(lib_root: &Path) -> AllowTable {
    let mut table = AllowTable::new();

    // Documented in the builtin help pages, not the library reference.
    table.insert("import".to_string(), Allowance::Ignore);
    table.insert("builtin".to_string(), Allowance::Ignore);

    // Deprecated aliases kept for one more release cycle.
    table.insert(
        "string".to_string(),
        allowed(["str_upper", "str_lower", "str_trim"]),
    );
    // Legacy padding knob, documented only in the changelog.
    table.insert("fmt".to_string(), allowed(["FMT_LEGACY_PAD"]));
    // Trap bookkeeping internals readers never set directly.
    table.insert(
        "error".to_string(),
        allowed(["ERR_STACK_DEPTH", "ERR_TRAP_SET"]),
    );

    // db re-exports the engine's vendored result constants; the sqlite page
    // documents them.
    table.insert(
        "db".to_string(),
        Allowance::Allow(extract::extract(lib_root, "sqlite", Some(&RE_SQLITE_CONSTANTS))),
    );
    // term mirrors the color table ansi declares.
    table.insert(
        "term".to_string(),
        Allowance::Allow(extract::extract(lib_root, "ansi", Some(&RE_COLOR_CONSTANTS))),
    );
    // path is a thin alias layer over the platform module's export list.
    let aliases = extract::declared_exports(lib_root, "unix").unwrap_or_default();
    table.insert(
        "path".to_string(),
        Allowance::Allow(aliases.into_iter().collect()),
    );

    table
}
