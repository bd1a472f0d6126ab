//! Documentation inventory loading.
//!
//! The docs build drops a cross-reference inventory at a fixed sub-path of
//! the doc tree. Each record names one documented target; records are
//! bucketed here by bare name (the part after the final `.`) so a symbol
//! lookup never depends on which module documented it.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Sub-path of the inventory artifact beneath the doc tree root.
pub const INVENTORY_SUBPATH: &str = "build/inventory.json";

/// One documentation cross-reference target.
///
/// Equality and hashing are structural over all fields: the same target
/// emitted twice collapses to one entry, while two roles sharing a name do
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct DocRecord {
    /// Fully-qualified, module-prefixed name, e.g. `os.getenv`.
    pub name: String,
    /// Markup domain the record belongs to, e.g. `lib`.
    pub domain: String,
    /// Object role, e.g. `function`, `data`.
    pub role: String,
    /// Search-ranking hint from the docs build.
    pub priority: i32,
    /// Page-relative location of the target.
    pub uri: String,
    /// Human display label, `-` when identical to `name`.
    pub dispname: String,
}

impl DocRecord {
    /// Final dotted component of the fully-qualified name.
    pub fn bare_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Bare symbol name → every record mentioning a symbol of that name.
pub type InventoryIndex = HashMap<String, HashSet<DocRecord>>;

#[derive(Deserialize)]
struct RawInventory {
    entries: Vec<DocRecord>,
}

/// Load the inventory artifact and index it by bare name.
///
/// Same attribute name in different modules (or under different roles) fans
/// in to one bucket. A missing artifact is fatal for the whole run: there is
/// nothing to compare against.
pub fn load(path: &Path) -> Result<InventoryIndex> {
    if !path.is_file() {
        bail!("inventory not found: {}", path.display());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read inventory: {}", path.display()))?;
    let inventory: RawInventory = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse inventory: {}", path.display()))?;

    let mut index: InventoryIndex = HashMap::new();
    for record in inventory.entries {
        let bare = record.bare_name().to_string();
        index.entry(bare).or_default().insert(record);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn inventory_file(entries: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"project": "stdlib", "entries": [{entries}]}}"#).unwrap();
        file
    }

    fn record(name: &str, role: &str) -> String {
        format!(
            r#"{{"name": "{name}", "domain": "lib", "role": "{role}", "priority": 1, "uri": "x.html#{name}", "dispname": "-"}}"#
        )
    }

    #[test]
    fn bare_name_is_last_component() {
        let file = inventory_file(&record("os.path.join", "function"));
        let index = load(file.path()).unwrap();
        assert!(index.contains_key("join"));
        assert!(!index.contains_key("os.path.join"));
    }

    #[test]
    fn same_bare_name_fans_in() {
        let entries = [
            record("os.getenv", "function"),
            record("env.getenv", "function"),
        ]
        .join(", ");
        let index = load(inventory_file(&entries).path()).unwrap();
        assert_eq!(index["getenv"].len(), 2);
    }

    #[test]
    fn duplicate_records_collapse() {
        let entries = [record("os.getenv", "function"), record("os.getenv", "function")].join(", ");
        let index = load(inventory_file(&entries).path()).unwrap();
        assert_eq!(index["getenv"].len(), 1);
    }

    #[test]
    fn same_name_different_role_kept_apart() {
        let entries = [record("os.sep", "data"), record("os.sep", "function")].join(", ");
        let index = load(inventory_file(&entries).path()).unwrap();
        assert_eq!(index["sep"].len(), 2);
    }

    #[test]
    fn every_record_sits_under_its_bare_name() {
        let entries = [
            record("os.getenv", "function"),
            record("string.upper", "function"),
            record("alone", "data"),
        ]
        .join(", ");
        let index = load(inventory_file(&entries).path()).unwrap();
        for (key, records) in &index {
            for record in records {
                assert_eq!(record.bare_name(), key);
            }
        }
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let entries = [record("os.getenv", "function"), record("os.sep", "data")].join(", ");
        let file = inventory_file(&entries);
        let first = load(file.path()).unwrap();
        let second = load(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load(Path::new("/nonexistent/inventory.json")).unwrap_err();
        assert!(err.to_string().contains("inventory not found"));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse inventory"));
    }
}
