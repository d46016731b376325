//! Utility functions.
//!
//! - [`substrings`] - substring enumeration for verification
//! - [`text`] - binary detection, line splitting, case folding
//! - [`progress`] - progress bars (no-op without the `progress` feature)
//!
//! ```
//! use gstree::utils::substrings;
//!
//! let all = substrings("wrd");
//! assert_eq!(all.len(), 6);
//! assert!(all.contains("rd"));
//! ```

pub mod progress;
pub mod substrings;
pub mod text;

pub use substrings::*;
pub use text::*;
