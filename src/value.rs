//! Dynamic value type for call arguments and programmed answers.
//!
//! Provides a flexible value type for argument capture, matching, and
//! report rendering. Stand-ins operate on dynamically typed calls, so
//! every positional argument, keyword argument, and programmed return
//! value is a `Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Dynamic value for call arguments and answers.
///
/// Wraps `serde_json::Value` to provide literal conversions and the
/// runtime type tags used by typed wildcard matchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(pub JsonValue);

/// Runtime type tag of a [`Value`], used by typed wildcard matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The null value.
    Null,
    /// A boolean.
    Bool,
    /// An integer number.
    Int,
    /// A floating-point number.
    Float,
    /// A string.
    String,
    /// An ordered list of values.
    List,
    /// A string-keyed mapping.
    Map,
}

impl ValueType {
    /// Get the name used in matcher descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Create a null value.
    pub fn null() -> Self {
        Self(JsonValue::Null)
    }

    /// Create a boolean value.
    pub fn bool(v: bool) -> Self {
        Self(JsonValue::Bool(v))
    }

    /// Create an integer value.
    pub fn int(v: i64) -> Self {
        Self(JsonValue::Number(v.into()))
    }

    /// Create a floating-point value.
    pub fn float(v: f64) -> Self {
        Self(serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number))
    }

    /// Create a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Self(JsonValue::String(v.into()))
    }

    /// Create a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self(JsonValue::Array(items.into_iter().map(|v| v.0).collect()))
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Get the runtime type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match &self.0 {
            JsonValue::Null => ValueType::Null,
            JsonValue::Bool(_) => ValueType::Bool,
            JsonValue::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueType::Int
                } else {
                    ValueType::Float
                }
            }
            JsonValue::String(_) => ValueType::String,
            JsonValue::Array(_) => ValueType::List,
            JsonValue::Object(_) => ValueType::Map,
        }
    }

    /// Render the value for use in call descriptions and failure reports.
    ///
    /// Strings keep their quotes so `"2"` and `2` stay distinguishable in
    /// a report line.
    pub fn render(&self) -> String {
        self.0.to_string()
    }

    /// Access the inner `serde_json::Value`.
    pub fn inner(&self) -> &JsonValue {
        &self.0
    }

    /// Convert into the inner `serde_json::Value`.
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        Self(v)
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self(JsonValue::Number(v.into()))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::bool(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::list(items)
    }
}

/// Build a `Vec<Value>` from heterogeneous literals.
///
/// ```
/// use standin::{values, Value};
///
/// let args = values![2, "two", true];
/// assert_eq!(args[1], Value::from("two"));
/// ```
#[macro_export]
macro_rules! values {
    () => { Vec::<$crate::value::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::value::Value::from($value)),+]
    };
}
