//! Generalized suffix tree: structure, construction and corpus loading
//!
//! - `arena`: node arena, text store, label propagation
//! - `builder`: online construction (generalized Ukkonen)
//! - `registry`: inserted texts and their identifiers
//! - `tree`: the [`GeneralizedSuffixTree`] facade
//! - `build`: line-oriented corpus loader
//! - `stats`: tree statistics

pub(crate) mod arena;
pub mod build;
pub(crate) mod builder;
pub(crate) mod registry;
pub mod stats;
pub mod tree;
pub mod types;

pub use build::{Corpus, CorpusConfig, Record, build_corpus};
pub use tree::GeneralizedSuffixTree;
pub use types::{LabelSet, StringId, TreeStats};
