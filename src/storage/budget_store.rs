use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{BudgetLimits, Money};

use super::{read_json_or_default, write_json};

/// Category spending limits, backed by one JSON file (`{"Food": 200.0, ...}`).
#[derive(Debug)]
pub struct BudgetStore {
    path: PathBuf,
    limits: BudgetLimits,
}

impl BudgetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limits: BudgetLimits::new(),
        }
    }

    /// Load limits from `path`. A missing file yields no limits.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let limits: BudgetLimits = read_json_or_default(&path)?;
        for category in non_positive_limits(&limits) {
            tracing::warn!(
                path = %path.display(),
                category,
                "loaded budget limit is not positive"
            );
        }
        tracing::debug!(budgets = limits.len(), "budgets loaded");
        Ok(Self { path, limits })
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.limits)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.limits.get(category).copied()
    }

    /// Limits ordered by category name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.limits
            .iter()
            .map(|(category, limit)| (category.as_str(), *limit))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Set the limit for a category, overwriting any existing one.
    /// Returns the previous limit.
    pub fn set(&mut self, category: impl Into<String>, limit: Money) -> Option<Money> {
        self.limits.insert(category.into(), limit)
    }

    /// Remove the limit for a category. Returns `None` when there was none.
    pub fn remove(&mut self, category: &str) -> Option<Money> {
        self.limits.remove(category)
    }

    pub fn clear(&mut self) -> BudgetLimits {
        std::mem::take(&mut self.limits)
    }

    pub(crate) fn restore(&mut self, limits: BudgetLimits) {
        self.limits = limits;
    }
}

fn non_positive_limits(limits: &BudgetLimits) -> Vec<&str> {
    limits
        .iter()
        .filter(|(_, limit)| **limit <= Money::ZERO)
        .map(|(category, _)| category.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use tempfile::TempDir;

    use super::*;

    fn d(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = BudgetStore::new("unused.json");
        assert_eq!(store.set("Food", d("200")), None);
        assert_eq!(store.set("Food", d("250")), Some(d("200")));
        assert_eq!(store.get("Food"), Some(d("250")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_unset_is_noop() {
        let mut store = BudgetStore::new("unused.json");
        store.set("Food", d("200"));

        assert_eq!(store.remove("Rent"), None);
        assert_eq!(store.remove("Food"), Some(d("200")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_iter_is_sorted_by_category() {
        let mut store = BudgetStore::new("unused.json");
        store.set("Rent", d("900"));
        store.set("Food", d("200"));

        let categories: Vec<&str> = store.iter().map(|(c, _)| c).collect();
        assert_eq!(categories, vec!["Food", "Rent"]);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("budgets.json");

        let mut store = BudgetStore::new(&path);
        store.set("Food", d("200"));
        store.set("Gym", d("35.5"));
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["Food"].as_f64(), Some(200.0));
        assert_eq!(raw["Gym"].as_f64(), Some(35.5));

        let loaded = BudgetStore::load(&path).unwrap();
        assert_eq!(loaded.limits(), store.limits());
    }

    #[test]
    fn test_load_keeps_non_positive_limits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("budgets.json");
        std::fs::write(&path, r#"{"Food": 200, "Gym": 0, "Rent": -5}"#).unwrap();

        let store = BudgetStore::load(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(non_positive_limits(store.limits()), vec!["Gym", "Rent"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = BudgetStore::load(temp.path().join("budgets.json")).unwrap();
        assert!(store.is_empty());
    }
}
