use crate::index::GeneralizedSuffixTree;
use crate::index::types::{LabelSet, NodeId, ROOT, StringId, Symbol};
use rayon::prelude::*;

/// Read-only substring search over a built tree
pub struct QueryExecutor<'a> {
    tree: &'a GeneralizedSuffixTree,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(tree: &'a GeneralizedSuffixTree) -> Self {
        Self { tree }
    }

    /// Label set of the node `pattern` lands in.
    ///
    /// The set is merged at insertion time, so this costs one descent of
    /// `pattern.len()` symbols and no recomputation.
    pub fn find(&self, pattern: &str) -> Option<&'a LabelSet> {
        self.locate(pattern)
            .map(|node| self.tree.arena().labels(node))
    }

    /// Identifiers of every string containing `pattern`
    pub fn search(&self, pattern: &str) -> LabelSet {
        self.find(pattern).cloned().unwrap_or_default()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.find(pattern).is_some_and(|labels| !labels.is_empty())
    }

    pub fn count(&self, pattern: &str) -> u64 {
        self.find(pattern).map_or(0, |labels| labels.len())
    }

    /// At most `limit` identifiers, in ascending order
    pub fn search_limited(&self, pattern: &str, limit: usize) -> Vec<StringId> {
        self.find(pattern)
            .map(|labels| labels.iter().take(limit).collect())
            .unwrap_or_default()
    }

    /// Independent searches fanned out over the rayon pool
    pub fn search_many<S: AsRef<str> + Sync>(&self, patterns: &[S]) -> Vec<LabelSet> {
        patterns
            .par_iter()
            .map(|pattern| self.search(pattern.as_ref()))
            .collect()
    }

    /// Descend from the root along `pattern`.
    ///
    /// Ends on a node, or inside the edge leading to the returned node.
    /// Returns `None` as soon as a symbol has no continuation.
    fn locate(&self, pattern: &str) -> Option<NodeId> {
        let arena = self.tree.arena();
        let mut node = ROOT;
        let mut chars = pattern.chars();

        while let Some(first) = chars.next() {
            let child = arena.child(node, Symbol::Char(first))?;

            // The first symbol was matched by the child lookup
            for offset in 1..arena.edge_len(child) {
                let Some(c) = chars.next() else {
                    return Some(child);
                };
                if arena.edge_symbol(child, offset) != Symbol::Char(c) {
                    return None;
                }
            }
            node = child;
        }

        Some(node)
    }
}
