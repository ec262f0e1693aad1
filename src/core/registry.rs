//! In-memory schema registry and the name search filter

use tracing::debug;

use crate::core::entry::{EntryId, SchemaEntry};

/// Ordered list of loaded schemas
///
/// Insertion order is preserved. Entries are never removed one at a time;
/// the list only grows by [`append`](Self::append) or is swapped wholesale by
/// [`replace_all`](Self::replace_all).
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Vec<SchemaEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning its id
    pub fn append(&mut self, entry: SchemaEntry) -> EntryId {
        let id = entry.id;
        debug!(%id, name = %entry.name, "registry append");
        self.entries.push(entry);
        id
    }

    /// Replace every entry with a freshly fetched list
    pub fn replace_all(&mut self, entries: Vec<SchemaEntry>) {
        debug!(count = entries.len(), "registry replace");
        self.entries = entries;
    }

    pub fn get(&self, id: EntryId) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Position of an entry in insertion order
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }
}

/// Entries whose name contains `term`, ignoring case, in original order
///
/// An empty term matches everything.
pub fn filter<'a, I>(entries: I, term: &str) -> Vec<&'a SchemaEntry>
where
    I: IntoIterator<Item = &'a SchemaEntry>,
{
    let needle = term.to_lowercase();
    entries
        .into_iter()
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_of(names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            registry.append(SchemaEntry::new(*name, json!({"title": name})));
        }
        registry
    }

    fn names<'a>(entries: &[&'a SchemaEntry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let registry = registry_of(&["b.json", "a.json", "c.json"]);
        let order: Vec<_> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["b.json", "a.json", "c.json"]);
    }

    #[test]
    fn test_duplicate_names_coexist() {
        let registry = registry_of(&["same.json", "same.json"]);
        assert_eq!(registry.len(), 2);
        assert_ne!(registry.entries()[0].id, registry.entries()[1].id);
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let mut registry = registry_of(&["old.json"]);
        let old_id = registry.entries()[0].id;
        registry.replace_all(vec![SchemaEntry::new("new.json", json!({}))]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(old_id));
        assert_eq!(registry.entries()[0].name, "new.json");
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = registry_of(&["a.json", "b.json"]);
        let id = registry.entries()[1].id;
        assert_eq!(registry.get(id).map(|e| e.name.as_str()), Some("b.json"));
        assert_eq!(registry.position(id), Some(1));
        assert!(registry.get(EntryId::new()).is_none());
    }

    #[test]
    fn test_filter_empty_term_is_identity() {
        let registry = registry_of(&["Person.json", "order.json", "Address.json"]);
        let all = filter(registry.iter(), "");
        assert_eq!(names(&all), vec!["Person.json", "order.json", "Address.json"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let registry = registry_of(&["Person.json", "order.json", "PERSONNEL.json"]);
        let hits = filter(registry.iter(), "pErSoN");
        assert_eq!(names(&hits), vec!["Person.json", "PERSONNEL.json"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let registry = registry_of(&["alpha.json", "beta.json", "alphabet.json"]);
        let once = filter(registry.iter(), "alp");
        let twice = filter(once.iter().copied(), "alp");
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn test_filter_no_match() {
        let registry = registry_of(&["alpha.json"]);
        assert!(filter(registry.iter(), "zeta").is_empty());
    }
}
