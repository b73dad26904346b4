//! A single delta operation.
//!
//! - `Insert` adds text or one embedded object, optionally formatted.
//! - `Retain` keeps existing content, optionally changing its formatting.
//! - `Delete` removes content and never carries attributes.
//!
//! Text length is measured in `char`s; an embed always has length 1. This
//! differs from UTF-16 counting for characters above U+FFFF (see the crate
//! docs).

use std::fmt;

use serde_json::{Map, Value};

use crate::attributes::AttributeMap;
use crate::error::{DeltaError, Result};

// ── Insert content ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertContent {
    Text(String),
    Embed(Map<String, Value>),
}

impl InsertContent {
    pub fn len(&self) -> usize {
        match self {
            InsertContent::Text(s) => s.chars().count(),
            InsertContent::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            InsertContent::Text(s) => s.is_empty(),
            InsertContent::Embed(_) => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, InsertContent::Text(_))
    }

    pub fn as_text(&self) -> Result<&str> {
        match self {
            InsertContent::Text(s) => Ok(s),
            InsertContent::Embed(_) => Err(DeltaError::NotText),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            InsertContent::Text(s) => Value::String(s.clone()),
            InsertContent::Embed(m) => Value::Object(m.clone()),
        }
    }
}

impl From<&str> for InsertContent {
    fn from(s: &str) -> Self {
        InsertContent::Text(s.to_string())
    }
}

impl From<String> for InsertContent {
    fn from(s: String) -> Self {
        InsertContent::Text(s)
    }
}

impl From<Map<String, Value>> for InsertContent {
    fn from(m: Map<String, Value>) -> Self {
        InsertContent::Embed(m)
    }
}

impl TryFrom<Value> for InsertContent {
    type Error = DeltaError;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::String(s) => Ok(InsertContent::Text(s)),
            Value::Object(m) => Ok(InsertContent::Embed(m)),
            other => Err(DeltaError::InvalidOp(format!(
                "insert must be a string or an object, got {other}"
            ))),
        }
    }
}

// ── Op ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Insert,
    Retain,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert {
        content: InsertContent,
        attributes: Option<AttributeMap>,
    },
    Retain {
        len: usize,
        attributes: Option<AttributeMap>,
    },
    Delete {
        len: usize,
    },
}

impl Op {
    pub fn insert(content: impl Into<InsertContent>, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            content: content.into(),
            attributes: attributes.and_then(AttributeMap::into_non_empty),
        }
    }

    pub fn retain(len: usize, attributes: Option<AttributeMap>) -> Result<Self> {
        if len == 0 {
            return Err(DeltaError::InvalidLength(0));
        }
        Ok(Op::Retain {
            len,
            attributes: attributes.and_then(AttributeMap::into_non_empty),
        })
    }

    pub fn delete(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(DeltaError::InvalidLength(0));
        }
        Ok(Op::Delete { len })
    }

    /// The implicit retain past the end of every delta.
    pub fn retain_until_end() -> Self {
        Op::Retain {
            len: usize::MAX,
            attributes: None,
        }
    }

    pub fn op_type(&self) -> OpType {
        match self {
            Op::Insert { .. } => OpType::Insert,
            Op::Retain { .. } => OpType::Retain,
            Op::Delete { .. } => OpType::Delete,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Op::Insert { .. })
    }

    pub fn is_text_insert(&self) -> bool {
        matches!(
            self,
            Op::Insert {
                content: InsertContent::Text(_),
                ..
            }
        )
    }

    pub fn is_retain(&self) -> bool {
        matches!(self, Op::Retain { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Op::Delete { .. })
    }

    pub fn length(&self) -> usize {
        match self {
            Op::Insert { content, .. } => content.len(),
            Op::Retain { len, .. } | Op::Delete { len } => *len,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => attributes.as_ref(),
            Op::Delete { .. } => None,
        }
    }

    pub fn has_attributes(&self) -> bool {
        self.attributes().is_some()
    }

    pub fn content(&self) -> Result<&InsertContent> {
        match self {
            Op::Insert { content, .. } => Ok(content),
            _ => Err(DeltaError::NotInsert),
        }
    }

    pub fn text(&self) -> Result<&str> {
        self.content()?.as_text()
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = crate::codec::json::op_to_json(self);
        match serde_json::to_string_pretty(&json) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
