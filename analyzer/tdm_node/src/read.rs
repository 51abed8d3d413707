//! Required and optional typed readers over any [`Node`].

use crate::{Node, NodeError, NodeKind};

/// Typed readers layered over [`Node`].
///
/// A field that is present but `null` counts as absent. Optional scalar
/// readers never fail: when the field holds the wrong kind of value they log
/// a warning and return the default. Optional list readers (`*_or_empty`)
/// only default when the field is absent.
pub trait NodeExt: Node {
    /// View this node as an object's key/value pairs.
    fn as_object_entries(&self) -> Result<Vec<(&str, &Self)>, NodeError> {
        if self.is_object() {
            Ok(self.children())
        } else {
            Err(NodeError::NotAnObject { found: self.kind() })
        }
    }

    /// View this node as an array's elements.
    fn as_array_items(&self) -> Result<&[Self], NodeError> {
        self.items()
            .ok_or(NodeError::NotAnArray { found: self.kind() })
    }

    /// A required field of an object node.
    fn field(&self, name: &str) -> Result<&Self, NodeError> {
        if !self.is_object() {
            return Err(NodeError::NotAnObject { found: self.kind() });
        }
        match self.get(name) {
            Some(node) if !node.is_null() => Ok(node),
            _ => Err(NodeError::MissingField {
                field: name.to_owned(),
            }),
        }
    }

    /// An optional field; `None` when absent, `null`, or `self` is not an object.
    fn try_field(&self, name: &str) -> Option<&Self> {
        self.get(name).filter(|node| !node.is_null())
    }

    /// This node as a string value.
    fn str_value(&self) -> Result<&str, NodeError> {
        self.as_str().ok_or(NodeError::UnexpectedKind {
            expected: NodeKind::String,
            found: self.kind(),
        })
    }

    /// This node as an integer value.
    fn int_value(&self) -> Result<i64, NodeError> {
        self.as_int().ok_or(NodeError::UnexpectedKind {
            expected: NodeKind::Number,
            found: self.kind(),
        })
    }

    fn read_str(&self, name: &str) -> Result<&str, NodeError> {
        let node = self.field(name)?;
        node.as_str().ok_or_else(|| wrong_type(name, NodeKind::String, node))
    }

    fn read_string(&self, name: &str) -> Result<String, NodeError> {
        self.read_str(name).map(str::to_owned)
    }

    fn read_bool(&self, name: &str) -> Result<bool, NodeError> {
        let node = self.field(name)?;
        node.as_bool()
            .ok_or_else(|| wrong_type(name, NodeKind::Bool, node))
    }

    fn read_int(&self, name: &str) -> Result<i64, NodeError> {
        let node = self.field(name)?;
        node.as_int()
            .ok_or_else(|| wrong_type(name, NodeKind::Number, node))
    }

    fn read_array(&self, name: &str) -> Result<&[Self], NodeError> {
        let node = self.field(name)?;
        node.items()
            .ok_or_else(|| wrong_type(name, NodeKind::Array, node))
    }

    fn read_object(&self, name: &str) -> Result<Vec<(&str, &Self)>, NodeError> {
        let node = self.field(name)?;
        if node.is_object() {
            Ok(node.children())
        } else {
            Err(wrong_type(name, NodeKind::Object, node))
        }
    }

    fn try_read_string(&self, name: &str) -> String {
        optional(self, name, NodeKind::String, Node::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    fn try_read_bool(&self, name: &str) -> bool {
        optional(self, name, NodeKind::Bool, Node::as_bool).unwrap_or_default()
    }

    fn try_read_int(&self, name: &str) -> i64 {
        optional(self, name, NodeKind::Number, Node::as_int).unwrap_or_default()
    }

    /// An optional array field; empty when absent. A present field must
    /// still be an array.
    fn read_array_or_empty(&self, name: &str) -> Result<&[Self], NodeError> {
        match self.try_field(name) {
            Some(node) => node
                .items()
                .ok_or_else(|| wrong_type(name, NodeKind::Array, node)),
            None => Ok(&[]),
        }
    }

    /// An optional object field; empty when absent. A present field must
    /// still be an object.
    fn read_object_or_empty(&self, name: &str) -> Result<Vec<(&str, &Self)>, NodeError> {
        match self.try_field(name) {
            Some(node) if node.is_object() => Ok(node.children()),
            Some(node) => Err(wrong_type(name, NodeKind::Object, node)),
            None => Ok(Vec::new()),
        }
    }
}

impl<N: Node> NodeExt for N {}

fn wrong_type<N: Node>(name: &str, expected: NodeKind, node: &N) -> NodeError {
    NodeError::WrongType {
        field: name.to_owned(),
        expected,
        found: node.kind(),
    }
}

/// Shared body of the `try_read_*` readers.
fn optional<'a, N: Node, T>(
    parent: &'a N,
    name: &str,
    expected: NodeKind,
    extract: impl FnOnce(&'a N) -> Option<T>,
) -> Option<T> {
    let node = parent.try_field(name)?;
    let value = extract(node);
    if value.is_none() {
        tracing::warn!(
            field = name,
            expected = %expected,
            found = %node.kind(),
            "optional field has the wrong type, using default"
        );
    }
    value
}
