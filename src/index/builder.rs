//! Online construction of the generalized suffix tree
//!
//! Each inserted text runs Ukkonen's algorithm from a fresh active point at
//! the root, against the tree every earlier text already shaped:
//!
//! 1. Leaves of the current text end in `EdgeEnd::Open`, so extending every
//!    leaf by one symbol (rule 1) costs nothing.
//! 2. A missing continuation creates a leaf, splitting the edge first when
//!    the active point sits inside one (rule 2).
//! 3. An existing continuation ends the phase (rule 3).
//!
//! Texts end in their own terminator, which matches nothing else in the
//! tree. By the last phase every suffix has therefore become a leaf of its
//! own, and every leaf of an earlier text is already closed.

use super::arena::NodeArena;
use super::types::*;

/// Transient per-insertion state: the active point and pending suffixes
pub(crate) struct Builder<'a> {
    arena: &'a mut NodeArena,
    text: TextId,
    id: StringId,
    active_node: NodeId,
    /// Position in the current text of the first symbol of the active edge
    active_edge: usize,
    active_length: usize,
    /// Suffixes still waiting to be made explicit
    remainder: usize,
    leaves: Vec<NodeId>,
}

impl<'a> Builder<'a> {
    pub fn new(arena: &'a mut NodeArena, text: TextId, id: StringId) -> Self {
        Self {
            arena,
            text,
            id,
            active_node: ROOT,
            active_edge: 0,
            active_length: 0,
            remainder: 0,
            leaves: Vec::new(),
        }
    }

    /// Insert every symbol of the text and its terminator.
    ///
    /// Returns the leaves created, one per suffix, with their edges closed.
    pub fn run(mut self) -> Vec<NodeId> {
        let len = self.arena.texts().symbol_len(self.text);
        self.leaves.reserve(len);

        for pos in 0..len {
            self.extend(pos);
        }
        assert_eq!(
            self.remainder, 0,
            "suffixes left pending after the terminator"
        );

        for &leaf in &self.leaves {
            self.arena.close_edge(leaf, len);
        }
        self.leaves
    }

    /// One phase: make every pending suffix end with the symbol at `pos`
    fn extend(&mut self, pos: usize) {
        let symbol = self.arena.texts().symbol(self.text, pos);
        self.arena.set_open_end(pos + 1);
        self.remainder += 1;

        // Internal node created earlier in this phase, waiting for its suffix link
        let mut pending: Option<NodeId> = None;

        while self.remainder > 0 {
            if self.active_length == 0 {
                self.active_edge = pos;
            }
            let edge_symbol = self.arena.texts().symbol(self.text, self.active_edge);

            match self.arena.child(self.active_node, edge_symbol) {
                None => {
                    let leaf =
                        self.arena
                            .add_leaf(self.active_node, edge_symbol, Edge::open(self.text, pos));
                    self.tag(leaf);
                    if let Some(node) = pending.take() {
                        self.arena.set_suffix_link(node, self.active_node);
                    }
                }
                Some(next) => {
                    if self.walk_down(next) {
                        continue;
                    }

                    if self.arena.edge_symbol(next, self.active_length) == symbol {
                        if let Some(node) = pending.take() {
                            self.arena.set_suffix_link(node, self.active_node);
                        }
                        self.active_length += 1;
                        break;
                    }

                    let middle =
                        self.arena
                            .split_edge(self.active_node, edge_symbol, self.active_length);
                    let leaf = self
                        .arena
                        .add_leaf(middle, symbol, Edge::open(self.text, pos));
                    self.tag(leaf);
                    if let Some(node) = pending.replace(middle) {
                        self.arena.set_suffix_link(node, middle);
                    }
                }
            }

            self.remainder -= 1;
            if self.active_node == ROOT && self.active_length > 0 {
                self.active_length -= 1;
                self.active_edge = pos + 1 - self.remainder;
            } else if self.active_node != ROOT {
                self.active_node = self.arena.suffix_link(self.active_node).unwrap_or(ROOT);
            }
        }
    }

    /// Canonize: step over `next` when the active length covers its whole edge
    fn walk_down(&mut self, next: NodeId) -> bool {
        let len = self.arena.edge_len(next);
        if self.active_length < len {
            return false;
        }
        self.active_edge += len;
        self.active_length -= len;
        self.active_node = next;
        true
    }

    /// Label a fresh leaf; propagation tags every ancestor on the way up
    fn tag(&mut self, leaf: NodeId) {
        self.leaves.push(leaf);
        self.arena.merge_label(leaf, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(texts: &[(&str, StringId)]) -> NodeArena {
        let mut arena = NodeArena::new();
        for &(text, id) in texts {
            let text_id = arena.texts_mut().push(text);
            Builder::new(&mut arena, text_id, id).run();
        }
        arena
    }

    /// Walk `path` from the root and return the node the walk ends in
    fn landing(arena: &NodeArena, path: &str) -> Option<NodeId> {
        let mut node = ROOT;
        let mut chars = path.chars();
        while let Some(first) = chars.next() {
            let child = arena.child(node, Symbol::Char(first))?;
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

    #[test]
    fn test_one_leaf_per_suffix() {
        let mut arena = NodeArena::new();
        let text = arena.texts_mut().push("banana");
        let leaves = Builder::new(&mut arena, text, 0).run();

        // six suffixes plus the lone terminator
        assert_eq!(leaves.len(), 7);
        assert!(leaves.iter().all(|&leaf| arena.is_leaf(leaf)));
        arena.assert_consistent();
    }

    #[test]
    fn test_internal_nodes_of_banana() {
        let arena = build(&[("banana", 0)]);
        // root, a, ana, na plus seven leaves
        assert_eq!(arena.len(), 11);
        let ana = landing(&arena, "ana").unwrap();
        let na = landing(&arena, "na").unwrap();
        let a = landing(&arena, "a").unwrap();
        assert!(!arena.is_leaf(ana));
        assert_eq!(arena.suffix_link(ana), Some(na));
        assert_eq!(arena.suffix_link(na), Some(a));
    }

    #[test]
    fn test_empty_text_makes_terminator_leaf() {
        let mut arena = NodeArena::new();
        let text = arena.texts_mut().push("");
        let leaves = Builder::new(&mut arena, text, 9).run();
        assert_eq!(leaves.len(), 1);
        assert_eq!(arena.child(ROOT, Symbol::Terminator(text)), Some(leaves[0]));
        assert!(arena.labels(ROOT).contains(9));
    }

    #[test]
    fn test_shared_prefix_is_not_mislabeled() {
        // "ab" of the second text stops inside the "abc" edge and must split it
        let arena = build(&[("abc", 0), ("abd", 1)]);
        arena.assert_consistent();

        let abc = landing(&arena, "abc").unwrap();
        assert!(arena.labels(abc).contains(0));
        assert!(!arena.labels(abc).contains(1));
        let ab = landing(&arena, "ab").unwrap();
        assert_eq!(arena.labels(ab).iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_repeated_text_gets_its_own_terminators() {
        let arena = build(&[("cacao", 0), ("cacao", 1)]);
        arena.assert_consistent();
        for path in ["c", "ca", "cac", "acao", "o"] {
            let node = landing(&arena, path).unwrap();
            assert_eq!(arena.labels(node).len(), 2, "{path}");
        }
    }

    #[test]
    fn test_every_edge_closed() {
        let arena = build(&[("mississippi", 0), ("missouri", 1), ("", 2)]);
        for node in arena.node_ids() {
            assert!(!arena.edge(node).is_open());
        }
        arena.assert_consistent();
    }
}
