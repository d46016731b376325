//! Substring search over a built tree

pub mod executor;

pub use executor::QueryExecutor;
