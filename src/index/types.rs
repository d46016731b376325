//! Identifiers, symbols, edge spans and tree statistics

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Caller-chosen identifier attached to an inserted string
pub type StringId = u32;

/// Set of string identifiers, as returned by searches
pub type LabelSet = RoaringBitmap;

/// Slot of a node in the arena
pub(crate) type NodeId = u32;

/// Identifier of a stored text; doubles as the text's terminator
pub(crate) type TextId = u32;

/// The root is always the first arena slot
pub(crate) const ROOT: NodeId = 0;

/// One position of an indexed string.
///
/// Terminators sit outside the `char` space, so caller input can never
/// produce one and two texts never share a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Symbol {
    Char(char),
    Terminator(TextId),
}

/// End boundary of an edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeEnd {
    /// Fixed end position (exclusive)
    Closed(usize),
    /// Follows the end of the text currently being inserted
    Open,
}

/// Edge label as a span of a stored text.
///
/// Every node stores the edge leading into it; the root's edge is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    /// Text the span points into
    pub text: TextId,
    /// Start position (inclusive)
    pub start: usize,
    /// End position
    pub end: EdgeEnd,
}

impl Edge {
    pub const fn empty() -> Self {
        Self {
            text: 0,
            start: 0,
            end: EdgeEnd::Closed(0),
        }
    }

    pub const fn open(text: TextId, start: usize) -> Self {
        Self {
            text,
            start,
            end: EdgeEnd::Open,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.end == EdgeEnd::Open
    }
}

/// Summary of the tree's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Distinct texts stored
    pub text_count: u32,
    /// Distinct identifiers inserted
    pub identifier_count: u64,
    /// Total nodes, root included
    pub node_count: u32,
    /// Nodes with children, root included
    pub internal_count: u32,
    /// Nodes without children
    pub leaf_count: u32,
    /// Internal nodes (root excluded) that carry a suffix link
    pub suffix_link_count: u32,
    /// Symbols indexed, terminators included
    pub symbol_count: u64,
    /// Longest stored text, in characters
    pub max_text_len: u32,
}
