/// Categories offered by default. Any other non-empty name is also accepted.
pub const PRESET_CATEGORIES: [&str; 6] = [
    "Salary",
    "Food",
    "Rent",
    "Utilities",
    "Entertainment",
    "Others",
];

/// Selecting this preset means "use the custom name instead".
pub const CUSTOM_CATEGORY: &str = "Others";

/// Filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Resolve the category actually recorded for a selection.
/// Returns `None` when the selection is empty, or when `Others` was picked
/// without a custom name.
pub fn resolve_category(selected: &str, custom: Option<&str>) -> Option<String> {
    let selected = selected.trim();
    if selected == CUSTOM_CATEGORY {
        return custom
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }
    if selected.is_empty() {
        None
    } else {
        Some(selected.to_string())
    }
}

pub fn is_preset(category: &str) -> bool {
    PRESET_CATEGORIES.contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_preset() {
        assert_eq!(resolve_category("Food", None), Some("Food".to_string()));
        assert_eq!(
            resolve_category("Rent", Some("ignored")),
            Some("Rent".to_string())
        );
    }

    #[test]
    fn test_resolve_custom() {
        assert_eq!(
            resolve_category("Others", Some(" Gym ")),
            Some("Gym".to_string())
        );
        assert_eq!(resolve_category("Others", Some("")), None);
        assert_eq!(resolve_category("Others", None), None);
    }

    #[test]
    fn test_resolve_free_form_and_empty() {
        assert_eq!(
            resolve_category("Travel", None),
            Some("Travel".to_string())
        );
        assert_eq!(resolve_category("  ", None), None);
    }

    #[test]
    fn test_is_preset() {
        assert!(is_preset("Utilities"));
        assert!(!is_preset("Travel"));
    }
}
