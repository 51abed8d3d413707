//! `serde_json` backing for [`Node`].

use serde_json::Value;

use crate::{Node, NodeError, NodeKind};

/// Parse document text into a JSON node tree.
pub fn parse_json(text: &str) -> Result<Value, NodeError> {
    serde_json::from_str(text).map_err(|err| NodeError::Json {
        message: err.to_string(),
        line: err.line(),
        column: err.column(),
    })
}

impl Node for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }

    fn get(&self, field: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(field))
    }

    fn items(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    // `preserve_order` keeps the map in document order.
    fn children(&self) -> Vec<(&str, &Self)> {
        match self {
            Value::Object(map) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            _ => Vec::new(),
        }
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn as_int(&self) -> Option<i64> {
        Value::as_i64(self).or_else(|| self.as_u64().map(|_| i64::MAX))
    }
}
