//! Selected ingredient set

/// Pills shown when there is no pantry to suggest from
pub const DEFAULT_QUICK_ADD: [&str; 13] = [
    "Flour", "Sugar", "Eggs", "Milk", "Butter", "Salt", "Pepper", "Onions", "Garlic", "Potatoes",
    "Tomatoes", "Chicken", "Rice",
];

/// Ordered list of trimmed, non-empty, distinct ingredient names
///
/// Duplicates are exact, case-sensitive matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientSelection {
    items: Vec<String>,
}

impl IngredientSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the ingredient was added
    pub fn add(&mut self, ingredient: &str) -> bool {
        let trimmed = ingredient.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Returns `true` when something was removed
    pub fn remove(&mut self, ingredient: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != ingredient);
        self.items.len() != before
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.items.iter().any(|item| item == ingredient)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let mut selection = IngredientSelection::new();
        assert!(selection.add("  garlic "));
        assert!(!selection.add("   "));
        assert!(!selection.add(""));
        assert_eq!(selection.items(), ["garlic".to_string()]);
    }

    #[test]
    fn test_duplicate_is_noop_but_case_matters() {
        let mut selection = IngredientSelection::new();
        assert!(selection.add("Eggs"));
        assert!(!selection.add("Eggs"));
        assert!(!selection.add(" Eggs"));
        assert!(selection.add("eggs"));
        assert_eq!(selection.items().len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut selection = IngredientSelection::new();
        for name in ["a", "b", "c"] {
            selection.add(name);
        }
        assert!(selection.remove("b"));
        assert!(!selection.remove("b"));
        assert_eq!(selection.items(), ["a".to_string(), "c".to_string()]);
    }
}
