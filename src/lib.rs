//! # gstree - Generalized Suffix Tree
//!
//! gstree indexes a growing collection of labeled strings and answers
//! "which strings contain this substring?" in time proportional to the
//! pattern length plus the size of the answer, whatever the amount of text
//! indexed.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Tree structure, online construction and corpus loading
//! - [`query`] - Read-only substring search
//! - [`output`] - Result formatting (ripgrep-like and JSON)
//! - [`utils`] - Substring enumeration, line splitting, progress bars
//!
//! ## Quick Start
//!
//! ```
//! use gstree::GeneralizedSuffixTree;
//!
//! let mut tree = GeneralizedSuffixTree::new();
//! tree.insert("cacao", 0);
//! tree.insert("cacao", 1);
//! tree.insert("banana", 2);
//!
//! let ids: Vec<u32> = tree.search("ao").iter().collect();
//! assert_eq!(ids, vec![0, 1]);
//! assert!(tree.search("caco").is_empty());
//! ```
//!
//! ## How it works
//!
//! Every string is inserted with Ukkonen's online algorithm, ending in a
//! terminator no other string shares. Each node keeps the set of identifiers
//! whose strings pass through its subtree, merged as leaves are created, so
//! a search is one descent followed by reading a ready-made set.

pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use index::{GeneralizedSuffixTree, LabelSet, StringId, TreeStats};
