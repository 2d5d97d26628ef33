//! Value types for dtoforge
//!
//! This module defines:
//! - Value: Unified enum for every property value held by a slot or a template
//! - ValueType: Semantic type tag attached to each property declaration
//! - PropertyValue: Bridge between Rust types and `Value` for typed access
//!
//! ### Type Rules
//!
//! - No implicit type coercions: a `Float` slot never accepts an `Int`
//! - `Int(1) != Float(1.0)`, different types are never equal
//! - `Bytes` are not `String`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - `Null` is only accepted by `Optional` types

use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Canonical value held by instance slots and template entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Absent value (only valid for `Optional` properties)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// UUID identifier
    Uuid(Uuid),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
    /// Array of values
    Array(Vec<Value>),
    /// Object with string keys
    Object(HashMap<String, Value>),
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Uuid(_) => "Uuid",
            Value::Timestamp(_) => "Timestamp",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
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

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as Uuid if this is a Uuid value
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }
}

// ============================================================================
// ValueType
// ============================================================================

/// Semantic type tag of a property
///
/// Every slot of a synthesized type is typed by one of these tags. The tag
/// decides which `Value` variants the slot accepts and the value a slot holds
/// before anything is assigned (the type default).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// `bool`, default `false`
    Bool,
    /// `i64`, default `0`
    Int,
    /// `f64`, default `0.0`
    Float,
    /// `String`, default empty
    String,
    /// `Vec<u8>`, default empty
    Bytes,
    /// `Uuid`, default nil
    Uuid,
    /// UTC timestamp, default Unix epoch
    Timestamp,
    /// Array of values, default empty
    Array,
    /// String-keyed object, default empty
    Object,
    /// Nullable wrapper, default `Null`
    Optional(Box<ValueType>),
}

impl ValueType {
    /// Wrap a type as optional
    pub fn optional(inner: ValueType) -> Self {
        ValueType::Optional(Box::new(inner))
    }

    /// Value a slot of this type holds before assignment
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Bytes => Value::Bytes(Vec::new()),
            ValueType::Uuid => Value::Uuid(Uuid::nil()),
            ValueType::Timestamp => Value::Timestamp(epoch()),
            ValueType::Array => Value::Array(Vec::new()),
            ValueType::Object => Value::Object(HashMap::new()),
            ValueType::Optional(_) => Value::Null,
        }
    }

    /// Check whether a value may be stored in a slot of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Optional(_), Value::Null) => true,
            (ValueType::Optional(inner), v) => inner.accepts(v),
            (ValueType::Bool, Value::Bool(_))
            | (ValueType::Int, Value::Int(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::String, Value::String(_))
            | (ValueType::Bytes, Value::Bytes(_))
            | (ValueType::Uuid, Value::Uuid(_))
            | (ValueType::Timestamp, Value::Timestamp(_))
            | (ValueType::Array, Value::Array(_))
            | (ValueType::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Check if this type is nullable
    pub fn is_optional(&self) -> bool {
        matches!(self, ValueType::Optional(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "Bool"),
            ValueType::Int => write!(f, "Int"),
            ValueType::Float => write!(f, "Float"),
            ValueType::String => write!(f, "String"),
            ValueType::Bytes => write!(f, "Bytes"),
            ValueType::Uuid => write!(f, "Uuid"),
            ValueType::Timestamp => write!(f, "Timestamp"),
            ValueType::Array => write!(f, "Array"),
            ValueType::Object => write!(f, "Object"),
            ValueType::Optional(inner) => write!(f, "Optional<{}>", inner),
        }
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or_default()
}

// ============================================================================
// PropertyValue: typed access
// ============================================================================

/// Rust types that can be stored in a property slot
///
/// `value_type()` is compared against the declared property type before any
/// read or write, so a `PropertyRef<C, i64>` can never observe a `String`
/// slot.
pub trait PropertyValue: Sized {
    /// Declared type this Rust type maps to
    fn value_type() -> ValueType;

    /// Convert into a slot value
    fn into_value(self) -> Value;

    /// Convert from a slot value, `None` on variant mismatch
    fn from_value(value: Value) -> Option<Self>;
}

impl PropertyValue for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl PropertyValue for i64 {
    fn value_type() -> ValueType {
        ValueType::Int
    }
    fn into_value(self) -> Value {
        Value::Int(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        value.as_int()
    }
}

impl PropertyValue for i32 {
    fn value_type() -> ValueType {
        ValueType::Int
    }
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
    fn from_value(value: Value) -> Option<Self> {
        value.as_int().and_then(|i| i32::try_from(i).ok())
    }
}

impl PropertyValue for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }
    fn into_value(self) -> Value {
        Value::Float(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        value.as_float()
    }
}

impl PropertyValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }
    fn into_value(self) -> Value {
        Value::String(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PropertyValue for Vec<u8> {
    fn value_type() -> ValueType {
        ValueType::Bytes
    }
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl PropertyValue for Uuid {
    fn value_type() -> ValueType {
        ValueType::Uuid
    }
    fn into_value(self) -> Value {
        Value::Uuid(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        value.as_uuid()
    }
}

impl PropertyValue for DateTime<Utc> {
    fn value_type() -> ValueType {
        ValueType::Timestamp
    }
    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}

impl PropertyValue for Vec<Value> {
    fn value_type() -> ValueType {
        ValueType::Array
    }
    fn into_value(self) -> Value {
        Value::Array(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl PropertyValue for HashMap<String, Value> {
    fn value_type() -> ValueType {
        ValueType::Object
    }
    fn into_value(self) -> Value {
        Value::Object(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn value_type() -> ValueType {
        ValueType::optional(T::value_type())
    }
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            v => T::from_value(v).map(Some),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
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

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Bytes(b) => {
                serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
            Value::Uuid(u) => serde_json::Value::String(u.to_string()),
            Value::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_declared_type() {
        let types = [
            ValueType::Bool,
            ValueType::Int,
            ValueType::Float,
            ValueType::String,
            ValueType::Bytes,
            ValueType::Uuid,
            ValueType::Timestamp,
            ValueType::Array,
            ValueType::Object,
            ValueType::optional(ValueType::Uuid),
        ];
        for ty in types {
            assert!(ty.accepts(&ty.default_value()), "default of {} rejected", ty);
        }
    }

    #[test]
    fn test_scalar_defaults() {
        assert_eq!(ValueType::Int.default_value(), Value::Int(0));
        assert_eq!(ValueType::Float.default_value(), Value::Float(0.0));
        assert_eq!(ValueType::String.default_value(), Value::String(String::new()));
        assert_eq!(ValueType::Uuid.default_value(), Value::Uuid(Uuid::nil()));
        assert!(ValueType::optional(ValueType::Int).default_value().is_null());
    }

    #[test]
    fn test_no_implicit_coercion() {
        assert!(!ValueType::Float.accepts(&Value::Int(1)));
        assert!(!ValueType::Int.accepts(&Value::Float(1.0)));
        assert!(!ValueType::String.accepts(&Value::Bytes(b"a".to_vec())));
        assert!(!ValueType::String.accepts(&Value::Null));
    }

    #[test]
    fn test_optional_accepts_null_and_inner() {
        let ty = ValueType::optional(ValueType::Uuid);
        assert!(ty.accepts(&Value::Null));
        assert!(ty.accepts(&Value::Uuid(Uuid::new_v4())));
        assert!(!ty.accepts(&Value::String("x".to_string())));
    }

    #[test]
    fn test_int_not_equal_float() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_nan_not_equal_nan() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::Int.to_string(), "Int");
        assert_eq!(
            ValueType::optional(ValueType::Uuid).to_string(),
            "Optional<Uuid>"
        );
    }

    #[test]
    fn test_property_value_i32_range() {
        assert_eq!(i32::from_value(Value::Int(7)), Some(7));
        assert_eq!(i32::from_value(Value::Int(i64::MAX)), None);
        assert_eq!(i32::value_type(), ValueType::Int);
    }

    #[test]
    fn test_property_value_option() {
        assert_eq!(
            <Option<String>>::value_type(),
            ValueType::optional(ValueType::String)
        );
        assert_eq!(<Option<String>>::from_value(Value::Null), Some(None));
        assert_eq!(
            <Option<String>>::from_value(Value::String("a".to_string())),
            Some(Some("a".to_string()))
        );
        assert_eq!(<Option<String>>::from_value(Value::Int(1)), None);
        assert!(None::<i64>.into_value().is_null());
    }

    #[test]
    fn test_json_encoding_of_extended_types() {
        let id = Uuid::new_v4();
        let json: serde_json::Value = Value::Uuid(id).into();
        assert_eq!(json, serde_json::Value::String(id.to_string()));

        let json: serde_json::Value = Value::Bytes(b"foobar".to_vec()).into();
        assert_eq!(json, serde_json::Value::String("Zm9vYmFy".to_string()));
    }

    #[test]
    fn test_serde_json_float_nan_becomes_null() {
        let json: serde_json::Value = Value::Float(f64::NAN).into();
        assert!(json.is_null());
    }

    #[test]
    fn test_json_number_to_value() {
        let v: Value = serde_json::json!(2).into();
        assert_eq!(v, Value::Int(2));
        let v: Value = serde_json::json!(9.99).into();
        assert_eq!(v, Value::Float(9.99));
    }
}
