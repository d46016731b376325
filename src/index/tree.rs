use super::arena::NodeArena;
use super::builder::Builder;
use super::registry::Registry;
use super::stats;
use super::types::*;
use crate::query::QueryExecutor;
use tracing::debug;

/// Generalized suffix tree over many labeled strings.
///
/// Every string is inserted with a caller-chosen identifier; a search for a
/// pattern returns the identifiers of all strings containing it, in time
/// proportional to the pattern length.
///
/// # Examples
///
/// ```
/// use gstree::GeneralizedSuffixTree;
///
/// let mut tree = GeneralizedSuffixTree::new();
/// tree.insert("banana", 0);
/// tree.insert("bano", 1);
/// tree.insert("ba", 2);
///
/// assert_eq!(tree.search("ban").iter().collect::<Vec<_>>(), vec![0, 1]);
/// assert!(tree.search("nab").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GeneralizedSuffixTree {
    arena: NodeArena,
    registry: Registry,
}

impl GeneralizedSuffixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `text` under `id`.
    ///
    /// Identifiers need not be unique: the same identifier may label several
    /// strings and the same string may carry several identifiers. Inserting a
    /// (text, id) pair that is already present changes nothing.
    pub fn insert(&mut self, text: &str, id: StringId) {
        if let Some(existing) = self.registry.lookup(text) {
            if !self.registry.add_id(existing, id) {
                debug!(text_id = existing, id, "text already indexed with this identifier");
                return;
            }
            let mut touched = 0;
            for &leaf in &self.registry.entry(existing).leaves {
                touched += self.arena.merge_label(leaf, id);
            }
            debug!(text_id = existing, id, touched, "relabeled known text");
            return;
        }

        let text_id = self.arena.texts_mut().push(text);
        let leaves = Builder::new(&mut self.arena, text_id, id).run();
        debug!(
            text_id,
            id,
            leaves = leaves.len(),
            nodes = self.arena.len(),
            "indexed text"
        );
        self.registry.register(text, text_id, leaves, id);
    }

    /// Identifiers of every string containing `pattern`; empty when none does
    pub fn search(&self, pattern: &str) -> LabelSet {
        self.executor().search(pattern)
    }

    /// Borrowed label set of the node `pattern` lands in
    pub fn find(&self, pattern: &str) -> Option<&LabelSet> {
        self.executor().find(pattern)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.executor().contains(pattern)
    }

    /// Number of distinct identifiers whose strings contain `pattern`
    pub fn count(&self, pattern: &str) -> u64 {
        self.executor().count(pattern)
    }

    /// At most `limit` matching identifiers, smallest first
    pub fn search_limited(&self, pattern: &str, limit: usize) -> Vec<StringId> {
        self.executor().search_limited(pattern, limit)
    }

    /// Run several searches in parallel
    pub fn search_many<S: AsRef<str> + Sync>(&self, patterns: &[S]) -> Vec<LabelSet> {
        self.executor().search_many(patterns)
    }

    /// Every identifier inserted so far
    pub fn identifiers(&self) -> &LabelSet {
        self.arena.labels(ROOT)
    }

    /// Number of distinct texts indexed
    pub fn text_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub fn stats(&self) -> TreeStats {
        stats::collect(&self.arena)
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::substrings;

    fn ids(set: &LabelSet) -> Vec<StringId> {
        set.iter().collect()
    }

    #[test]
    fn test_same_pair_twice_is_a_no_op() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("cacao", 0);
        let before = tree.stats();
        tree.insert("cacao", 0);
        assert_eq!(tree.stats(), before);
        assert_eq!(ids(&tree.search("ca")), vec![0]);
        tree.arena.assert_consistent();
    }

    #[test]
    fn test_same_text_new_id_adds_no_nodes() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("cacao", 0);
        let nodes = tree.stats().node_count;
        tree.insert("cacao", 1);

        assert_eq!(tree.stats().node_count, nodes);
        assert_eq!(tree.text_count(), 1);
        for s in substrings("cacao") {
            assert_eq!(ids(&tree.search(&s)), vec![0, 1], "{s}");
        }
        tree.arena.assert_consistent();
    }

    #[test]
    fn test_empty_text_registers_at_root() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("", 4);
        assert_eq!(ids(tree.identifiers()), vec![4]);
        assert_eq!(ids(&tree.search("")), vec![4]);
        assert!(tree.search("a").is_empty());
    }

    #[test]
    fn test_prefix_of_existing_text() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("banana", 0);
        tree.insert("ban", 1);
        tree.insert("nan", 2);

        assert_eq!(ids(&tree.search("an")), vec![0, 1, 2]);
        assert_eq!(ids(&tree.search("ana")), vec![0]);
        assert_eq!(ids(&tree.search("nan")), vec![0, 2]);
        tree.arena.assert_consistent();
    }

    #[test]
    fn test_labels_consistent_after_each_insert() {
        let mut tree = GeneralizedSuffixTree::new();
        let words = ["cacaor", "caricato", "cacato", "cacata", "caricata", "cacao", "banana"];
        for (i, word) in words.iter().enumerate() {
            tree.insert(word, i as StringId);
            tree.arena.assert_consistent();
        }
        for (i, word) in words.iter().enumerate() {
            tree.insert(word, (i + words.len()) as StringId);
            tree.arena.assert_consistent();
        }
        assert_eq!(tree.identifiers().len(), 14);
    }

    #[test]
    fn test_unicode_text() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("naïve café", 0);
        tree.insert("café au lait", 1);

        assert_eq!(ids(&tree.search("café")), vec![0, 1]);
        assert_eq!(ids(&tree.search("ïv")), vec![0]);
        assert!(tree.search("cafe").is_empty());
    }
}
