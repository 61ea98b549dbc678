mod budget_store;
mod ledger_store;

pub use budget_store::*;
pub use ledger_store::*;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// File name of the persisted ledger (transactions and balance).
pub const LEDGER_FILE: &str = "transactions.json";

/// File name of the persisted budget limits.
pub const BUDGET_FILE: &str = "budgets.json";

/// Locations of the two data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub ledger: PathBuf,
    pub budgets: PathBuf,
}

impl StoragePaths {
    /// Both files side by side in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            ledger: dir.join(LEDGER_FILE),
            budgets: dir.join(BUDGET_FILE),
        }
    }
}

/// Read a JSON document, or the default value when the file does not exist yet.
fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data file missing, starting empty");
        return Ok(T::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Overwrite a JSON document with the pretty-printed value.
// NOTE: plain overwrite; an interrupted write can leave a truncated file.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "data file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_paths_in_dir() {
        let paths = StoragePaths::in_dir("/tmp/money");
        assert_eq!(paths.ledger, PathBuf::from("/tmp/money/transactions.json"));
        assert_eq!(paths.budgets, PathBuf::from("/tmp/money/budgets.json"));
    }
}
