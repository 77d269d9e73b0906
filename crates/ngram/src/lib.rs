//! N-gram similarity index
//!
//! A set of items that can be searched by the N-gram similarity of their
//! string keys. Each item's key is padded, split into overlapping grams of
//! `N` characters, and recorded in an inverted gram table. A search walks
//! only the grams of the query, so its cost depends on the query length and
//! the posting lists it touches rather than the size of the index.
//!
//! Similarity is the ratio of shared grams to all grams of the pair
//! (multiset intersection over multiset union), optionally bent by a `warp`
//! exponent that favours short strings.
//!
//! # Example
//!
//! ```rust
//! use ngram::NGramIndex;
//!
//! let index = NGramIndex::<String>::builder()
//!     .threshold(0.2)
//!     .build_with(["spam".to_string(), "eggs".to_string(), "ham".to_string()])
//!     .unwrap();
//!
//! let matches = index.search("spom", None).unwrap();
//! assert_eq!(matches[0].item, "spam");
//! ```
//!
//! The index is a plain in-memory structure. Share it between threads behind
//! a lock that serializes writers; searches only need `&self`.

pub mod config;
pub mod error;
pub mod grams;
pub mod index;
pub mod key;
pub mod similarity;
pub mod snapshot;

// Re-export main types at crate root
pub use config::{parse_pad_char, IndexConfig};
pub use error::{NGramError, Result};
pub use index::{IndexBuilder, NGramIndex, SearchMatch};
pub use key::{KeyError, KeyFn, KeyRegistry, IDENTITY};
pub use similarity::ngram_similarity;
pub use snapshot::IndexSnapshot;
