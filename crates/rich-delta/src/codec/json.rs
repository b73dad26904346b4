//! JSON codec for deltas.
//!
//! Encoding emits each operation as an object with exactly one of
//! `insert`, `retain` or `delete`, plus `attributes` when present.
//! Decoding keeps the operations as given; nothing is merged or dropped.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::attributes::AttributeMap;
use crate::delta::Delta;
use crate::error::{DeltaError, Result};
use crate::op::{InsertContent, Op};

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a `Delta` as `{"ops":[...]}`.
pub fn to_json(delta: &Delta) -> Value {
    json!({ "ops": delta.iter().map(op_to_json).collect::<Vec<_>>() })
}

pub fn op_to_json(op: &Op) -> Value {
    let mut obj = Map::new();
    let attributes = match op {
        Op::Insert {
            content,
            attributes,
        } => {
            obj.insert("insert".into(), content.to_json());
            attributes.as_ref()
        }
        Op::Retain { len, attributes } => {
            obj.insert("retain".into(), json!(len));
            attributes.as_ref()
        }
        Op::Delete { len } => {
            obj.insert("delete".into(), json!(len));
            None
        }
    };
    if let Some(attributes) = attributes.filter(|a| !a.is_empty()) {
        obj.insert("attributes".into(), attributes.to_json());
    }
    Value::Object(obj)
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Parse `{"ops":[...]}`. A bare array of operations is accepted too.
pub fn from_json(v: &Value) -> Result<Delta> {
    let ops = match v {
        Value::Array(_) => v,
        Value::Object(obj) => obj
            .get("ops")
            .ok_or_else(|| DeltaError::InvalidOp("missing 'ops' field".into()))?,
        _ => return Err(DeltaError::InvalidOp("delta must be an object".into())),
    };
    decode_ops(ops)
        .map(Delta::from)
        .inspect_err(|err| debug!(%err, "rejected delta"))
}

fn decode_ops(arr: &Value) -> Result<Vec<Op>> {
    let arr = arr
        .as_array()
        .ok_or_else(|| DeltaError::InvalidOp("ops must be array".into()))?;
    arr.iter().map(op_from_json).collect()
}

/// Parse a single operation. When several kinds are present, `insert` wins
/// over `delete`, which wins over `retain`.
pub fn op_from_json(v: &Value) -> Result<Op> {
    let obj = v
        .as_object()
        .ok_or_else(|| DeltaError::InvalidOp("operation must be an object".into()))?;
    if let Some(insert) = obj.get("insert") {
        let content = InsertContent::try_from(insert.clone())?;
        if content.is_empty() {
            return Err(DeltaError::InvalidOp("insert must not be empty".into()));
        }
        let attributes = decode_attributes(obj.get("attributes"))?;
        return Ok(Op::insert(content, attributes));
    }
    if let Some(delete) = obj.get("delete") {
        return Op::delete(decode_length(delete, "delete")?);
    }
    if let Some(retain) = obj.get("retain") {
        let attributes = decode_attributes(obj.get("attributes"))?;
        return Op::retain(decode_length(retain, "retain")?, attributes);
    }
    Err(DeltaError::InvalidOp(
        "operation must have 'insert', 'retain' or 'delete'".into(),
    ))
}

fn decode_length(v: &Value, field: &str) -> Result<usize> {
    if let Some(n) = v.as_u64().filter(|&n| n > 0) {
        return usize::try_from(n)
            .map_err(|_| DeltaError::InvalidOp(format!("{field} is out of range")));
    }
    match v.as_i64() {
        Some(n) => Err(DeltaError::InvalidLength(n)),
        None => Err(DeltaError::InvalidOp(format!(
            "{field} must be a positive integer"
        ))),
    }
}

fn decode_attributes(v: Option<&Value>) -> Result<Option<AttributeMap>> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(AttributeMap::from(map.clone()).into_non_empty()),
        Some(_) => Err(DeltaError::InvalidOp(
            "attributes must be an object".into(),
        )),
    }
}
