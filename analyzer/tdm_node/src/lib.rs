//! Node access layer for analysis documents.
//!
//! The construct loader never touches a concrete document format. It reads
//! through the [`Node`] trait, which exposes object/array/scalar access, and
//! the [`NodeExt`] helpers layered on top of it:
//!
//! - `read_*`: required reads, failing with [`NodeError::MissingField`] or
//!   [`NodeError::WrongType`].
//! - `try_read_*`: optional scalar reads that fall back to a default and
//!   never fail.
//! - `*_or_empty`: optional list reads, empty when absent but still checked
//!   when present.
//!
//! `serde_json::Value` implements [`Node`]; [`parse_json`] turns document text
//! into one.

mod error;
mod json;
mod read;

pub use error::NodeError;
pub use json::parse_json;
pub use read::NodeExt;

use std::fmt;

/// Shape of a single document node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    /// Scalars are every kind that is neither an array nor an object.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, NodeKind::Array | NodeKind::Object)
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "a bool",
            NodeKind::Number => "a number",
            NodeKind::String => "a string",
            NodeKind::Array => "an array",
            NodeKind::Object => "an object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read access to one node of a parsed document.
///
/// Implementors only provide the primitive accessors; everything that can
/// fail with a positional message lives in [`NodeExt`].
pub trait Node: Sized {
    /// The shape of this node.
    fn kind(&self) -> NodeKind;

    /// Look up a field of an object node. Non-objects have no fields.
    fn get(&self, field: &str) -> Option<&Self>;

    /// The elements of an array node, in document order.
    fn items(&self) -> Option<&[Self]>;

    /// The key/value pairs of an object node, in document order.
    ///
    /// Returns an empty list for every other kind of node.
    fn children(&self) -> Vec<(&str, &Self)>;

    fn as_str(&self) -> Option<&str>;

    fn as_bool(&self) -> Option<bool>;

    /// An integer node. Non-negative integers beyond `i64::MAX` saturate.
    fn as_int(&self) -> Option<i64>;

    #[inline]
    fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    #[inline]
    fn is_array(&self) -> bool {
        self.kind() == NodeKind::Array
    }

    #[inline]
    fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }
}
