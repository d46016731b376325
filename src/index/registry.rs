//! Registry of inserted texts
//!
//! Maps text content to the text id it was stored under, together with the
//! leaves built for it and the identifiers it was inserted with. Inserting a
//! known text again only has to relabel those leaves.

use super::types::{LabelSet, NodeId, StringId, TextId};
use ahash::AHashMap;

#[derive(Debug, Default)]
pub(crate) struct TextEntry {
    /// One leaf per suffix, terminator-only suffix included
    pub leaves: Vec<NodeId>,
    pub ids: LabelSet,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    by_text: AHashMap<Box<str>, TextId>,
    entries: Vec<TextEntry>,
}

impl Registry {
    pub fn lookup(&self, text: &str) -> Option<TextId> {
        self.by_text.get(text).copied()
    }

    pub fn entry(&self, text: TextId) -> &TextEntry {
        &self.entries[text as usize]
    }

    /// Record `id` for a known text. Returns false if it was already there.
    pub fn add_id(&mut self, text: TextId, id: StringId) -> bool {
        self.entries[text as usize].ids.insert(id)
    }

    /// Register a freshly built text. Text ids are handed out in order.
    pub fn register(&mut self, content: &str, text: TextId, leaves: Vec<NodeId>, id: StringId) {
        assert_eq!(
            text as usize,
            self.entries.len(),
            "texts must be registered in insertion order"
        );
        let mut ids = LabelSet::new();
        ids.insert(id);
        self.entries.push(TextEntry { leaves, ids });
        self.by_text.insert(content.into(), text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::default();
        registry.register("cacao", 0, vec![1, 2, 3], 5);
        registry.register("", 1, vec![4], 6);

        assert_eq!(registry.lookup("cacao"), Some(0));
        assert_eq!(registry.lookup(""), Some(1));
        assert_eq!(registry.lookup("caca"), None);
        assert_eq!(registry.entry(0).leaves, vec![1, 2, 3]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_id_reports_duplicates() {
        let mut registry = Registry::default();
        registry.register("ba", 0, vec![1, 2, 3], 2);
        assert!(!registry.add_id(0, 2));
        assert!(registry.add_id(0, 5));
        assert!(registry.entry(0).ids.contains(5));
    }
}
