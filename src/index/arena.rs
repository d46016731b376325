//! Node arena backing the suffix tree
//!
//! Nodes live in a single `Vec` and refer to each other through `NodeId`
//! handles: parents, children and suffix links are plain indices, so the
//! builder can rewire them without any ownership between nodes. Edge labels
//! are spans into the append-only [`TextStore`].

use super::types::*;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Append-only storage for every inserted text.
///
/// A text of `n` characters is read as `n + 1` symbols: its characters
/// followed by its own terminator.
#[derive(Debug, Default)]
pub(crate) struct TextStore {
    texts: Vec<Box<[char]>>,
}

impl TextStore {
    /// Store a text and return its id
    pub fn push(&mut self, text: &str) -> TextId {
        assert!(
            self.texts.len() < TextId::MAX as usize,
            "text store is full"
        );
        let id = self.texts.len() as TextId;
        self.texts.push(text.chars().collect());
        id
    }

    /// Symbol at `pos`; the position just past the last character is the terminator
    #[inline]
    pub fn symbol(&self, text: TextId, pos: usize) -> Symbol {
        let chars = &self.texts[text as usize];
        match chars.get(pos) {
            Some(&c) => Symbol::Char(c),
            None => {
                debug_assert_eq!(pos, chars.len(), "read past terminator");
                Symbol::Terminator(text)
            }
        }
    }

    /// Number of symbols in a text, terminator included
    #[inline]
    pub fn symbol_len(&self, text: TextId) -> usize {
        self.texts[text as usize].len() + 1
    }

    pub fn chars(&self, text: TextId) -> &[char] {
        &self.texts[text as usize]
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

}

#[derive(Debug, Clone)]
struct Node {
    children: FxHashMap<Symbol, NodeId>,
    parent: Option<NodeId>,
    /// Edge leading into this node
    edge: Edge,
    suffix_link: Option<NodeId>,
    labels: LabelSet,
}

impl Node {
    fn new(parent: Option<NodeId>, edge: Edge, labels: LabelSet) -> Self {
        Self {
            children: FxHashMap::default(),
            parent,
            edge,
            suffix_link: None,
            labels,
        }
    }
}

/// Owner of all nodes and texts of one tree
#[derive(Debug)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    texts: TextStore,
    /// Resolution of `EdgeEnd::Open` for the text being inserted
    open_end: usize,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Create an arena holding only the root: no edges, no labels
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, Edge::empty(), LabelSet::new())],
            texts: TextStore::default(),
            open_end: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn texts(&self) -> &TextStore {
        &self.texts
    }

    pub fn texts_mut(&mut self) -> &mut TextStore {
        &mut self.texts
    }

    /// Publish the current end of the text being built
    #[inline]
    pub fn set_open_end(&mut self, end: usize) {
        self.open_end = end;
    }

    #[inline]
    pub fn child(&self, node: NodeId, symbol: Symbol) -> Option<NodeId> {
        self.nodes[node as usize].children.get(&symbol).copied()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node as usize].children.is_empty()
    }

    #[cfg(test)]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node as usize].parent
    }

    #[cfg(test)]
    pub fn edge(&self, node: NodeId) -> Edge {
        self.nodes[node as usize].edge
    }

    /// Length of the edge leading into `node`, resolving open ends
    #[inline]
    pub fn edge_len(&self, node: NodeId) -> usize {
        let edge = self.nodes[node as usize].edge;
        let end = match edge.end {
            EdgeEnd::Closed(end) => end,
            EdgeEnd::Open => self.open_end,
        };
        end - edge.start
    }

    /// Symbol `offset` positions into the edge leading into `node`
    #[inline]
    pub fn edge_symbol(&self, node: NodeId, offset: usize) -> Symbol {
        let edge = self.nodes[node as usize].edge;
        self.texts.symbol(edge.text, edge.start + offset)
    }

    #[inline]
    pub fn labels(&self, node: NodeId) -> &LabelSet {
        &self.nodes[node as usize].labels
    }

    pub fn suffix_link(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node as usize].suffix_link
    }

    pub fn set_suffix_link(&mut self, node: NodeId, target: NodeId) {
        debug_assert!(node != ROOT, "the root has no suffix link");
        self.nodes[node as usize].suffix_link = Some(target);
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        assert!(self.nodes.len() < NodeId::MAX as usize, "node arena is full");
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Install `parent --symbol--> child`.
    ///
    /// Panics if `parent` already has an edge starting with `symbol`;
    /// callers split instead.
    pub fn add_edge(&mut self, parent: NodeId, symbol: Symbol, child: NodeId) {
        let previous = self.nodes[parent as usize].children.insert(symbol, child);
        assert!(
            previous.is_none(),
            "node {parent} already has an edge for {symbol:?}"
        );
        self.nodes[child as usize].parent = Some(parent);
    }

    /// Allocate a leaf under `parent` reached through `edge`
    pub fn add_leaf(&mut self, parent: NodeId, symbol: Symbol, edge: Edge) -> NodeId {
        let leaf = self.alloc(Node::new(Some(parent), edge, LabelSet::new()));
        self.add_edge(parent, symbol, leaf);
        leaf
    }

    /// Split the edge `parent --symbol-->` after `at` symbols.
    ///
    /// The original destination keeps its id and hangs below the new middle
    /// node, which starts with a copy of the destination's labels. Returns the
    /// middle node.
    pub fn split_edge(&mut self, parent: NodeId, symbol: Symbol, at: usize) -> NodeId {
        let Some(child) = self.child(parent, symbol) else {
            panic!("node {parent} has no edge for {symbol:?} to split");
        };
        debug_assert!(at > 0 && at < self.edge_len(child), "split outside edge");

        let edge = self.nodes[child as usize].edge;
        let split_pos = edge.start + at;
        let head = Edge {
            text: edge.text,
            start: edge.start,
            end: EdgeEnd::Closed(split_pos),
        };
        let labels = self.nodes[child as usize].labels.clone();
        let middle = self.alloc(Node::new(Some(parent), head, labels));

        let tail_symbol = self.texts.symbol(edge.text, split_pos);
        {
            let node = &mut self.nodes[child as usize];
            node.edge.start = split_pos;
            node.parent = Some(middle);
        }
        self.nodes[middle as usize].children.insert(tail_symbol, child);
        self.nodes[parent as usize].children.insert(symbol, middle);

        trace!(parent, middle, child, at, "split edge");
        middle
    }

    /// Add `id` to `node` and its ancestors.
    ///
    /// Stops at the first node already holding `id`: a node's labels are
    /// always a subset of its parent's. Returns how many nodes changed.
    pub fn merge_label(&mut self, node: NodeId, id: StringId) -> usize {
        let mut current = Some(node);
        let mut touched = 0;
        while let Some(n) = current {
            let slot = &mut self.nodes[n as usize];
            if !slot.labels.insert(id) {
                break;
            }
            touched += 1;
            current = slot.parent;
        }
        touched
    }

    /// Pin an open edge to its final end
    pub fn close_edge(&mut self, node: NodeId, end: usize) {
        let edge = &mut self.nodes[node as usize].edge;
        if edge.is_open() {
            edge.end = EdgeEnd::Closed(end);
        }
    }

    /// Iterate over all node ids
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len() as NodeId
    }

    /// Check the label and parent invariants over the whole arena
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut all = LabelSet::new();
        for id in self.node_ids() {
            let node = &self.nodes[id as usize];
            assert!(!node.edge.is_open(), "node {id} still has an open edge");
            for &child in node.children.values() {
                assert_eq!(self.nodes[child as usize].parent, Some(id));
                assert!(
                    node.labels.is_superset(&self.nodes[child as usize].labels),
                    "labels of {child} escape its parent {id}"
                );
            }
            if node.children.is_empty() {
                all |= &node.labels;
            }
        }
        assert_eq!(self.labels(ROOT), &all);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(text: &str) -> (NodeArena, TextId) {
        let mut arena = NodeArena::new();
        let id = arena.texts_mut().push(text);
        (arena, id)
    }

    #[test]
    fn test_new_root_is_bare() {
        let arena = NodeArena::new();
        assert_eq!(arena.len(), 1);
        assert!(arena.is_leaf(ROOT));
        assert!(arena.labels(ROOT).is_empty());
        assert_eq!(arena.parent(ROOT), None);
    }

    #[test]
    fn test_text_store_terminator() {
        let (arena, id) = arena_with("ab");
        assert_eq!(arena.texts().symbol(id, 0), Symbol::Char('a'));
        assert_eq!(arena.texts().symbol(id, 2), Symbol::Terminator(id));
        assert_eq!(arena.texts().symbol_len(id), 3);
    }

    #[test]
    #[should_panic(expected = "already has an edge")]
    fn test_add_edge_rejects_duplicate() {
        let (mut arena, id) = arena_with("aa");
        let edge = Edge {
            text: id,
            start: 0,
            end: EdgeEnd::Closed(3),
        };
        arena.add_leaf(ROOT, Symbol::Char('a'), edge);
        arena.add_leaf(ROOT, Symbol::Char('a'), edge);
    }

    #[test]
    fn test_split_keeps_labels() {
        let (mut arena, id) = arena_with("abc");
        let leaf = arena.add_leaf(
            ROOT,
            Symbol::Char('a'),
            Edge {
                text: id,
                start: 0,
                end: EdgeEnd::Closed(4),
            },
        );
        arena.merge_label(leaf, 7);

        let middle = arena.split_edge(ROOT, Symbol::Char('a'), 2);
        assert_eq!(arena.child(ROOT, Symbol::Char('a')), Some(middle));
        assert_eq!(arena.child(middle, Symbol::Char('c')), Some(leaf));
        assert_eq!(arena.edge_len(middle), 2);
        assert_eq!(arena.edge_len(leaf), 2);
        assert_eq!(arena.edge_symbol(leaf, 1), Symbol::Terminator(id));
        assert!(arena.labels(middle).contains(7));
        assert_eq!(arena.parent(leaf), Some(middle));
        arena.assert_consistent();
    }

    #[test]
    fn test_split_rewires_spans() {
        let (mut arena, id) = arena_with("abc");
        let leaf = arena.add_leaf(ROOT, Symbol::Char('a'), Edge::open(id, 0));
        arena.set_open_end(3);
        let middle = arena.split_edge(ROOT, Symbol::Char('a'), 1);
        arena.close_edge(leaf, 4);

        assert_eq!(
            arena.edge(middle),
            Edge {
                text: id,
                start: 0,
                end: EdgeEnd::Closed(1),
            }
        );
        assert_eq!(
            arena.edge(leaf),
            Edge {
                text: id,
                start: 1,
                end: EdgeEnd::Closed(4),
            }
        );
        assert_eq!(arena.parent(middle), Some(ROOT));
        assert_eq!(arena.parent(leaf), Some(middle));
    }

    #[test]
    fn test_merge_label_is_idempotent() {
        let (mut arena, id) = arena_with("ab");
        let leaf = arena.add_leaf(
            ROOT,
            Symbol::Char('a'),
            Edge {
                text: id,
                start: 0,
                end: EdgeEnd::Closed(3),
            },
        );
        assert_eq!(arena.merge_label(leaf, 1), 2);
        assert_eq!(arena.merge_label(leaf, 1), 0);
        assert_eq!(arena.merge_label(leaf, 2), 2);
        assert_eq!(arena.labels(ROOT).len(), 2);
        arena.assert_consistent();
    }

    #[test]
    fn test_open_edge_follows_published_end() {
        let (mut arena, id) = arena_with("abc");
        let leaf = arena.add_leaf(ROOT, Symbol::Char('a'), Edge::open(id, 0));
        arena.set_open_end(1);
        assert_eq!(arena.edge_len(leaf), 1);
        arena.set_open_end(3);
        assert_eq!(arena.edge_len(leaf), 3);
        arena.close_edge(leaf, 4);
        arena.set_open_end(0);
        assert_eq!(arena.edge_len(leaf), 4);
    }
}
