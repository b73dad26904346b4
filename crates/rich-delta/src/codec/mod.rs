//! Wire formats for deltas.
//!
//! The JSON form is `{"ops":[...]}`. `Serialize`/`Deserialize` are
//! implemented on top of it, so any serde format carrying the same shape
//! works as well.

pub mod json;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::delta::Delta;
use crate::op::Op;

impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json::to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        json::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json::op_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        json::op_from_json(&value).map_err(serde::de::Error::custom)
    }
}
