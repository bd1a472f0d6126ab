//! Comparison engine: module symbols vs the documentation inventory.
//!
//! One module per call, pure set work: every extracted public symbol must
//! have an exact `module.symbol` record in the inventory, unless it is a
//! submodule reference or the allow-list tolerates it. The engine never
//! errors — modules it cannot resolve are skipped and the run moves on.

use crate::allow::{AllowTable, Allowance};
use crate::extract;
use crate::inventory::InventoryIndex;
use crate::report::MissingReport;
use std::path::Path;

/// Check one module against the inventory.
///
/// Returns `None` for an unresolvable module, a module the allow-list says
/// to ignore, or a module with no missing symbols. Pass `allow = None` to
/// disable the allow-list entirely.
pub fn check(
    lib_root: &Path,
    module: &str,
    index: &InventoryIndex,
    allow: Option<&AllowTable>,
) -> Option<MissingReport> {
    // Resolution is also needed per-symbol for submodule detection below,
    // so the silent skip is decided here as well as inside the extractor.
    extract::resolve(lib_root, module)?;

    if let Some(Allowance::Ignore) = allow.and_then(|table| table.get(module)) {
        return None;
    }

    let mut missing: Vec<String> = Vec::new();
    for symbol in extract::extract(lib_root, module, None) {
        let qualified = format!("{module}.{symbol}");
        let documented = index
            .get(&symbol)
            .is_some_and(|records| records.iter().any(|r| r.name == qualified));
        if documented {
            continue;
        }
        // Submodules are documented on their own page, not as attributes.
        if extract::resolve(lib_root, &qualified).is_some() {
            continue;
        }
        missing.push(symbol);
    }

    if let Some(Allowance::Allow(tolerated)) = allow.and_then(|table| table.get(module)) {
        missing.retain(|symbol| !tolerated.contains(symbol));
    }

    if missing.is_empty() {
        return None;
    }
    missing.sort();
    missing.dedup();
    Some(MissingReport {
        module: module.to_string(),
        missing,
    })
}
