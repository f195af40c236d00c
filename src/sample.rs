//! The sample document, converted once from `serde_json::Value` and read-only afterwards.
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde_json::Value;

use crate::ir::Primitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Number {
    Int(i64),
    UInt(u64),                 // integers above i64::MAX
    Float(OrderedFloat<f64>),
}

impl Number {
    /// Integer vs. float follows how the sample spelled the number:
    /// `1` is an integer, `1.0` is not.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int(_) | Self::UInt(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<SampleValue>),
    Mapping(IndexMap<String, SampleValue>), // document key order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind { Null, Bool, Int, Float, Text, Sequence, Mapping }

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Text => "string",
            Self::Sequence => "array",
            Self::Mapping => "object",
        })
    }
}

impl SampleValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(n) if n.is_integer() => ValueKind::Int,
            Self::Number(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// The primitive kind a scalar maps to; `None` for null and containers.
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Self::Bool(_) => Some(Primitive::Bool),
            Self::Number(n) if n.is_integer() => Some(Primitive::Int),
            Self::Number(_) => Some(Primitive::Float),
            Self::Text(_) => Some(Primitive::String),
            Self::Null | Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i)
        } else if let Some(u) = n.as_u64() {
            Self::UInt(u)
        } else {
            // serde_json only fails `as_f64` for arbitrary-precision numbers, which we don't enable
            Self::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN)))
        }
    }
}

impl From<&Value> for SampleValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.into()),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(xs) => Self::Sequence(xs.iter().map(Self::from).collect()),
            Value::Object(m) => Self::Mapping(
                m.iter().map(|(k, v)| (k.clone(), Self::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for SampleValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Array(xs) => Self::Sequence(xs.into_iter().map(Self::from).collect()),
            Value::Object(m) => Self::Mapping(
                m.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
            Value::String(s) => Self::Text(s),
            other => Self::from(&other),
        }
    }
}
