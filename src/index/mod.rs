//! Inverted index for multi-field recipe filtering.
//!
//! Postings are built per field (tag, region, type, ingredient token) and
//! combined with set intersection:
//!
//! ```rust,ignore
//! use forgotten_recipes::index::{IndexField, InvertedIndex};
//!
//! let index = InvertedIndex::from_recipes(&recipes);
//! let indian_curries = InvertedIndex::intersect(&[
//!     index.lookup(IndexField::Region, "Indian"),
//!     index.lookup(IndexField::Tag, "curry"),
//! ]);
//! ```

pub mod inverted_index;

pub use inverted_index::{tokenize, IndexField, InvertedIndex, Postings, MIN_TOKEN_LEN};
