//! Argument matchers.
//!
//! A matcher is a predicate over a single argument value. Literal values
//! in a call pattern wrap into [`Matcher::Exact`]; the constructors and
//! constants here cover the wildcard and structural cases. `describe()`
//! strings appear verbatim in failure reports, so test suites may assert
//! on them.

use crate::error::{Result, StandinError};
use crate::value::{Value, ValueType};
use serde_json::Value as JsonValue;
use std::fmt;

/// Predicate over a single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Matches iff the value equals the wrapped value.
    Exact(Value),
    /// Matches any single value, including null.
    Any,
    /// Matches any value with the given runtime type tag.
    OfType(ValueType),
    /// Matches a string containing the substring, or a list containing it
    /// as a string element. Incompatible types never match and never
    /// error.
    Contains(String),
    /// Matches a list containing the element. Evaluating a non-list value
    /// is a matcher error.
    ListContains(Value),
    /// Matches iff the value equals one of the candidates.
    AnyOf(Vec<Value>),
}

/// Wildcard for a single argument in any position.
pub const ANY_VALUE: Matcher = Matcher::Any;

/// Wildcard for any boolean argument.
pub const ANY_BOOLEAN: Matcher = Matcher::OfType(ValueType::Bool);

/// Wildcard for any integer argument.
pub const ANY_INTEGER: Matcher = Matcher::OfType(ValueType::Int);

/// Wildcard for any floating-point argument.
pub const ANY_FLOAT: Matcher = Matcher::OfType(ValueType::Float);

/// Wildcard for any string argument.
pub const ANY_STRING: Matcher = Matcher::OfType(ValueType::String);

/// Wildcard for any list argument.
pub const ANY_LIST: Matcher = Matcher::OfType(ValueType::List);

/// Wildcard for any map argument.
pub const ANY_MAP: Matcher = Matcher::OfType(ValueType::Map);

/// Create a matcher accepting any value of the given type.
pub fn any_value_of_type(value_type: ValueType) -> Matcher {
    Matcher::OfType(value_type)
}

/// Create a matcher accepting strings that contain `substring`.
pub fn contains(substring: impl Into<String>) -> Matcher {
    Matcher::Contains(substring.into())
}

/// Create a matcher accepting lists that contain `element`.
pub fn a_list_containing(element: impl Into<Value>) -> Matcher {
    Matcher::ListContains(element.into())
}

/// Create a matcher accepting any of the candidate values.
///
/// Construction with zero candidates is a matcher error.
pub fn any_of<I, V>(candidates: I) -> Result<Matcher>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let candidates: Vec<Value> = candidates.into_iter().map(Into::into).collect();
    if candidates.is_empty() {
        return Err(StandinError::Matcher(
            "any_of() requires at least one candidate value".to_string(),
        ));
    }
    Ok(Matcher::AnyOf(candidates))
}

impl Matcher {
    /// Evaluate the matcher against a value.
    ///
    /// Never errors except [`Matcher::ListContains`] applied to a value
    /// without list structure.
    pub fn matches(&self, value: &Value) -> Result<bool> {
        match self {
            Self::Exact(expected) => Ok(value == expected),
            Self::Any => Ok(true),
            Self::OfType(value_type) => Ok(value.value_type() == *value_type),
            Self::Contains(substring) => Ok(match value.inner() {
                JsonValue::String(s) => s.contains(substring.as_str()),
                JsonValue::Array(items) => items
                    .iter()
                    .any(|item| item.as_str() == Some(substring.as_str())),
                _ => false,
            }),
            Self::ListContains(element) => match value.inner() {
                JsonValue::Array(items) => Ok(items.iter().any(|item| item == element.inner())),
                _ => Err(StandinError::Matcher(format!(
                    "a_list_containing cannot look into a value of type \"{}\"",
                    value.value_type()
                ))),
            },
            Self::AnyOf(candidates) => Ok(candidates.iter().any(|candidate| candidate == value)),
        }
    }

    /// Fixed description used verbatim in failure reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(value) => value.render(),
            Self::Any => "<< ANY_VALUE >>".to_string(),
            Self::OfType(value_type) => {
                format!("<< Any value of type \"{}\" >>", value_type.name())
            }
            Self::Contains(substring) => format!("<< a string containing \"{substring}\" >>"),
            Self::ListContains(element) => format!("<< a list containing {} >>", element.render()),
            Self::AnyOf(candidates) => {
                let rendered: Vec<String> = candidates.iter().map(Value::render).collect();
                format!("<< Any value in [{}] >>", rendered.join(", "))
            }
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_matches_equal_values_only() {
        let matcher = Matcher::Exact(Value::int(2));
        assert!(matcher.matches(&Value::int(2)).unwrap());
        assert!(!matcher.matches(&Value::int(3)).unwrap());
        assert!(!matcher.matches(&Value::string("2")).unwrap());
    }

    #[test]
    fn any_value_matches_everything_including_null() {
        assert!(ANY_VALUE.matches(&Value::string("hello world")).unwrap());
        assert!(ANY_VALUE.matches(&Value::int(1)).unwrap());
        assert!(ANY_VALUE.matches(&Value::null()).unwrap());
    }

    #[test]
    fn typed_wildcards_check_the_type_tag() {
        assert!(ANY_INTEGER.matches(&Value::int(2)).unwrap());
        assert!(!ANY_INTEGER.matches(&Value::string("2")).unwrap());
        assert!(ANY_STRING.matches(&Value::string("Hello world!")).unwrap());
        assert!(!ANY_STRING.matches(&Value::int(1)).unwrap());
        assert!(ANY_BOOLEAN.matches(&Value::bool(false)).unwrap());
        assert!(ANY_FLOAT.matches(&Value::float(1.23)).unwrap());
        assert!(ANY_LIST.matches(&Value::from(json!(["a", "b"]))).unwrap());
        assert!(ANY_MAP
            .matches(&Value::from(json!({"spam": "eggs"})))
            .unwrap());
    }

    #[test]
    fn contains_checks_substrings() {
        let matcher = contains("foo");
        assert!(matcher.matches(&Value::string("spam foo bar eggs")).unwrap());
        assert!(matcher.matches(&Value::string("foo")).unwrap());
        assert!(!matcher.matches(&Value::string("spam eggs")).unwrap());
    }

    #[test]
    fn contains_accepts_list_membership_and_ignores_other_types() {
        let matcher = contains("eggs");
        assert!(matcher
            .matches(&Value::from(json!(["spam", "eggs"])))
            .unwrap());
        assert!(!matcher.matches(&Value::from(json!(["spam"]))).unwrap());
        assert!(!matcher.matches(&Value::int(42)).unwrap());
        assert!(!matcher.matches(&Value::null()).unwrap());
    }

    #[test]
    fn list_containing_matches_membership() {
        let matcher = a_list_containing(2);
        assert!(matcher.matches(&Value::from(json!([1, 2, 3]))).unwrap());
        assert!(!matcher.matches(&Value::from(json!([4, 5]))).unwrap());
    }

    #[test]
    fn list_containing_errors_on_non_lists() {
        let matcher = a_list_containing(2);
        let err = matcher.matches(&Value::int(2)).unwrap_err();
        assert!(matches!(err, StandinError::Matcher(_)));
    }

    #[test]
    fn any_of_requires_candidates() {
        let err = any_of(Vec::<Value>::new()).unwrap_err();
        assert!(matches!(err, StandinError::Matcher(_)));
    }

    #[test]
    fn any_of_matches_candidate_values() {
        let matcher = any_of([1, 2]).unwrap();
        assert!(matcher.matches(&Value::int(2)).unwrap());
        assert!(!matcher.matches(&Value::int(3)).unwrap());
    }

    #[test]
    fn descriptions_are_stable() {
        assert_eq!(ANY_VALUE.describe(), "<< ANY_VALUE >>");
        assert_eq!(
            ANY_BOOLEAN.describe(),
            "<< Any value of type \"bool\" >>"
        );
        assert_eq!(
            contains("eggs").describe(),
            "<< a string containing \"eggs\" >>"
        );
        assert_eq!(
            a_list_containing(2).describe(),
            "<< a list containing 2 >>"
        );
        assert_eq!(
            any_of([1, 2, 3]).unwrap().describe(),
            "<< Any value in [1, 2, 3] >>"
        );
        assert_eq!(Matcher::Exact(Value::from("x")).describe(), "\"x\"");
    }
}
