//! Rich-text deltas.
//!
//! A [`Delta`] is a list of [`Op`]s that describes either a document (only
//! inserts) or a change to one (inserts, retains and deletes applied left to
//! right). Formatting is carried as an [`AttributeMap`] where a JSON `null`
//! value means "remove this attribute".
//!
//! Text lengths, and therefore every retain and delete count, are measured
//! in `char`s. Producers that count UTF-16 code units (JavaScript, Java)
//! disagree on text outside the Basic Multilingual Plane: `"😀x"` is 2 long
//! here and 3 long there, so deltas exchanged with such producers must not
//! carry astral characters, or must be converted at the boundary.
//!
//! ```
//! use rich_delta::{attrs, Delta};
//!
//! let doc = Delta::new().insert("Hello world\n");
//! let change = Delta::new()
//!     .retain_with(5, Some(attrs! { "bold": true }))
//!     .retain(1)
//!     .delete(5)
//!     .insert("there");
//!
//! let edited = doc.compose(&change);
//! assert_eq!(edited.plain_text(), "Hello there\n");
//! assert_eq!(edited.compose(&change.invert(&doc)), doc);
//! ```

pub mod attributes;
pub mod codec;
pub mod delta;
pub mod error;
pub mod iter;
pub mod op;

pub use attributes::AttributeMap;
pub use delta::Delta;
pub use error::{DeltaError, Result};
pub use iter::OpIterator;
pub use op::{InsertContent, Op, OpType};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
