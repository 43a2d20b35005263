//! Value types for Photon
//!
//! This module defines:
//! - Value: the closed tagged union held by every node
//! - ValueTag: the fixed, totally ordered variant tag used by the codec
//!
//! ## Canonical Value Model
//!
//! The Value enum has exactly 7 variants:
//! - Null, Bool, Int, Float, Text, List, Map
//!
//! ### Type Rules
//!
//! - Seven types only; there is no open-ended "any"
//! - No implicit coercions: `Int(1) != Float(1.0)`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Map keys are ordered (`BTreeMap`) so iteration is deterministic

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical Photon value type
///
/// Values are immutable once produced; assignment clones them. Equality is
/// structural, and different variants are never equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Keyed mapping of text to value
    Map(BTreeMap<String, Value>),
}

/// Variant tag of a [`Value`]
///
/// The declaration order is the total order of tags and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueTag {
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::Text`
    Text,
    /// `Value::List`
    List,
    /// `Value::Map`
    Map,
}

impl ValueTag {
    /// All tags in their fixed order
    pub const ALL: [ValueTag; 7] = [
        ValueTag::Null,
        ValueTag::Bool,
        ValueTag::Int,
        ValueTag::Float,
        ValueTag::Text,
        ValueTag::List,
        ValueTag::Map,
    ];

    /// Single-byte token that introduces this tag on the wire
    pub const fn token(self) -> u8 {
        match self {
            ValueTag::Null => b'z',
            ValueTag::Bool => b'b',
            ValueTag::Int => b'i',
            ValueTag::Float => b'f',
            ValueTag::Text => b't',
            ValueTag::List => b'l',
            ValueTag::Map => b'm',
        }
    }

    /// Inverse of [`ValueTag::token`]
    pub fn from_token(byte: u8) -> Option<Self> {
        ValueTag::ALL.into_iter().find(|tag| tag.token() == byte)
    }
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Get the variant tag
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::Text(_) => ValueTag::Text,
            Value::List(_) => ValueTag::List,
            Value::Map(_) => ValueTag::Map,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is a List value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as &BTreeMap if this is a Map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Nesting depth: scalars are 0, each List/Map level adds one
    pub fn depth(&self) -> usize {
        match self {
            Value::List(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
            Value::Map(m) => 1 + m.values().map(Value::depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// serde_json interop for ergonomic JSON construction
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX falls back to float
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(m) => serde_json::Value::Object(
                m.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_not_equal_float() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_nan_not_equal_nan() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    }

    #[test]
    fn test_structural_equality_nested() {
        let mut a = BTreeMap::new();
        a.insert("k".to_string(), Value::List(vec![Value::Int(1), Value::Null]));
        let mut b = BTreeMap::new();
        b.insert("k".to_string(), Value::List(vec![Value::Int(1), Value::Null]));
        assert_eq!(Value::Map(a), Value::Map(b.clone()));

        b.insert("k".to_string(), Value::List(vec![Value::Int(1)]));
        assert_ne!(Value::Map(BTreeMap::new()), Value::Map(b));
    }

    #[test]
    fn test_tag_order_is_fixed() {
        let mut sorted = ValueTag::ALL;
        sorted.sort();
        assert_eq!(sorted, ValueTag::ALL);
        assert!(ValueTag::Null < ValueTag::Map);
        assert!(ValueTag::Int < ValueTag::Float);
    }

    #[test]
    fn test_tag_tokens_round_trip() {
        for tag in ValueTag::ALL {
            assert_eq!(ValueTag::from_token(tag.token()), Some(tag));
        }
        assert_eq!(ValueTag::from_token(b'N'), None);
    }

    #[test]
    fn test_tag_matches_variant() {
        assert_eq!(Value::Null.tag(), ValueTag::Null);
        assert_eq!(Value::from(true).tag(), ValueTag::Bool);
        assert_eq!(Value::from(7i64).tag(), ValueTag::Int);
        assert_eq!(Value::from(0.5).tag(), ValueTag::Float);
        assert_eq!(Value::from("x").tag(), ValueTag::Text);
        assert_eq!(Value::List(vec![]).tag(), ValueTag::List);
        assert_eq!(Value::Map(BTreeMap::new()).tag(), ValueTag::Map);
    }

    #[test]
    fn test_depth() {
        assert_eq!(Value::Int(1).depth(), 0);
        assert_eq!(Value::List(vec![]).depth(), 1);
        let nested = Value::List(vec![Value::List(vec![Value::Int(1)])]);
        assert_eq!(nested.depth(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Bool(false)]).to_string(),
            "[1, false]"
        );
    }

    #[test]
    fn test_as_wrong_type_returns_none() {
        let v = Value::Int(42);
        assert!(v.as_bool().is_none());
        assert!(v.as_float().is_none());
        assert!(v.as_str().is_none());
        assert!(v.as_list().is_none());
        assert!(v.as_map().is_none());
        assert_eq!(v.as_int(), Some(42));
    }

    #[test]
    fn test_serde_json_nested_conversion() {
        let json = serde_json::json!({"a": [1, 2, "three"], "b": null});
        let v: Value = json.into();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("a").unwrap().as_list().unwrap().len(), 3);
        assert!(m.get("b").unwrap().is_null());
    }

    #[test]
    fn test_serde_json_float_nan_becomes_null() {
        let json: serde_json::Value = Value::Float(f64::NAN).into();
        assert!(json.is_null());
    }
}
