//! A streaming reader for XML-like markup.
//!
//! Documents are scanned one node at a time. Callers can either pull nodes
//! with [`Reader::read`] (optionally narrowed by a [`Filter`]) or register
//! listeners that are called while the scanner recognizes tokens, or both.
//! Only well-formedness is checked. There is no DTD or schema support.

pub mod dispatch;
pub mod error;
pub mod input;
pub mod node;
pub mod reader;
pub mod util;

pub use dispatch::{Dispatcher, Flow};
pub use error::{Error, Malformed, Position, Result};
pub use input::filter::{elements_only, ignore_elements, Filter, KeepAll, Verdict};
pub use node::{Attribute, Name, Node, NodeType, Prefix};
pub use reader::Reader;
