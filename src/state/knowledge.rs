use std::collections::HashMap;

use crate::models::KnowledgeEntry;

/// Meal name → nutrition entry, iterated in insertion order.
///
/// Insertion order is the enumeration order fuzzy matching relies on for
/// tie-breaks. Each key is written at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    entries: Vec<(String, KnowledgeEntry)>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the name is already present.
    ///
    /// Returns false (and leaves the existing entry untouched) for a
    /// duplicate name.
    pub fn insert(&mut self, name: &str, entry: KnowledgeEntry) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), entry));
        true
    }

    /// Exact (verbatim) lookup.
    pub fn get(&self, name: &str) -> Option<&KnowledgeEntry> {
        self.index
            .get(name)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KnowledgeEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, KnowledgeEntry)> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = (String, KnowledgeEntry)>>(iter: I) -> Self {
        let mut kb = KnowledgeBase::new();
        for (name, entry) in iter {
            kb.insert(&name, entry);
        }
        kb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionRecord;

    fn entry(calories: f64) -> KnowledgeEntry {
        KnowledgeEntry::from(NutritionRecord::new(calories, 0.0, 0.0, 0.0))
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut kb = KnowledgeBase::new();
        kb.insert("Zucchini Bake", entry(1.0));
        kb.insert("Apple Pie", entry(2.0));
        kb.insert("Meatloaf", entry(3.0));

        let names: Vec<&str> = kb.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Zucchini Bake", "Apple Pie", "Meatloaf"]);
    }

    #[test]
    fn test_duplicate_insert_keeps_first() {
        let mut kb = KnowledgeBase::new();
        assert!(kb.insert("Soup", entry(100.0)));
        assert!(!kb.insert("Soup", entry(900.0)));
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Soup").unwrap().record.calories, 100.0);
    }

    #[test]
    fn test_get_is_verbatim() {
        let mut kb = KnowledgeBase::new();
        kb.insert("Soup", entry(100.0));
        assert!(kb.contains("Soup"));
        assert!(kb.get("soup").is_none());
    }
}
