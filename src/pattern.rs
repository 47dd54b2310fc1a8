//! Call patterns built from literal values and matchers.
//!
//! A configuration or verification call supplies an [`ArgList`]: ordered
//! positional specs plus keyword specs. Building the [`CallPattern`]
//! wraps literals into exact matchers and validates the rest-wildcard
//! placement rule; matching never mutates anything.

use crate::error::{Result, StandinError};
use crate::ledger::CallArgs;
use crate::matcher::Matcher;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One argument slot in a configuration or verification call: a literal
/// value, a matcher, or the rest-wildcard marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSpec {
    /// A literal value, compared for equality.
    Value(Value),
    /// An explicit matcher.
    Matcher(Matcher),
    /// The rest-wildcard marker; see [`ANY_VALUES`].
    Rest,
}

/// Whole-argument-list wildcard. Must be the sole positional argument of
/// a pattern; such a pattern matches any arity and ignores keywords.
pub const ANY_VALUES: ArgSpec = ArgSpec::Rest;

impl From<Matcher> for ArgSpec {
    fn from(matcher: Matcher) -> Self {
        Self::Matcher(matcher)
    }
}

impl From<Value> for ArgSpec {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<i32> for ArgSpec {
    fn from(v: i32) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<i64> for ArgSpec {
    fn from(v: i64) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<f64> for ArgSpec {
    fn from(v: f64) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<bool> for ArgSpec {
    fn from(v: bool) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<&str> for ArgSpec {
    fn from(v: &str) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<String> for ArgSpec {
    fn from(v: String) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<serde_json::Value> for ArgSpec {
    fn from(v: serde_json::Value) -> Self {
        Self::Value(Value::from(v))
    }
}

/// The raw arguments of a configuration or verification call, before
/// pattern construction.
#[derive(Debug, Clone, Default)]
pub struct ArgList {
    positional: Vec<ArgSpec>,
    keywords: Vec<(String, ArgSpec)>,
}

impl ArgList {
    /// An empty argument list (a zero-argument call).
    pub fn new() -> Self {
        Self::default()
    }

    /// An argument list with the given positional specs.
    pub fn positional(specs: Vec<ArgSpec>) -> Self {
        Self {
            positional: specs,
            keywords: Vec::new(),
        }
    }

    /// Add a keyword argument spec.
    pub fn kw(mut self, name: impl Into<String>, spec: impl Into<ArgSpec>) -> Self {
        self.keywords.push((name.into(), spec.into()));
        self
    }
}

impl From<Vec<ArgSpec>> for ArgList {
    fn from(specs: Vec<ArgSpec>) -> Self {
        Self::positional(specs)
    }
}

/// Build an [`ArgList`] from literal values and matchers.
///
/// ```
/// use standin::{args, ANY_VALUE};
///
/// let exact = args![2, "two"];
/// let with_keyword = args![ANY_VALUE].kw("mode", "fast");
/// # let _ = (exact, with_keyword);
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::pattern::ArgList::new() };
    ($($spec:expr),+ $(,)?) => {
        $crate::pattern::ArgList::positional(
            vec![$($crate::pattern::ArgSpec::from($spec)),+],
        )
    };
}

#[derive(Debug, Clone, PartialEq)]
enum Positional {
    /// Rest-wildcard pattern: matches any arity, ignores keywords.
    Rest,
    Matchers(Vec<Matcher>),
}

/// A matcher-based pattern over a call's positional and keyword
/// arguments, built once per configuration or verification call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPattern {
    positional: Positional,
    keywords: BTreeMap<String, Matcher>,
}

impl CallPattern {
    /// Build a pattern from raw arguments.
    ///
    /// The rest-wildcard must be the sole positional argument and cannot
    /// be a keyword value; any other placement is
    /// [`StandinError::InvalidWildcardUsage`], raised here rather than at
    /// match time.
    pub fn build(list: ArgList) -> Result<Self> {
        let has_rest = list.positional.iter().any(|spec| *spec == ArgSpec::Rest);
        if list.keywords.iter().any(|(_, spec)| *spec == ArgSpec::Rest) {
            return Err(StandinError::InvalidWildcardUsage);
        }
        if has_rest {
            if list.positional.len() != 1 || !list.keywords.is_empty() {
                return Err(StandinError::InvalidWildcardUsage);
            }
            return Ok(Self {
                positional: Positional::Rest,
                keywords: BTreeMap::new(),
            });
        }

        let positional = list
            .positional
            .into_iter()
            .map(Self::wrap)
            .collect::<Vec<Matcher>>();
        let keywords = list
            .keywords
            .into_iter()
            .map(|(name, spec)| (name, Self::wrap(spec)))
            .collect::<BTreeMap<String, Matcher>>();
        Ok(Self {
            positional: Positional::Matchers(positional),
            keywords,
        })
    }

    fn wrap(spec: ArgSpec) -> Matcher {
        match spec {
            ArgSpec::Value(value) => Matcher::Exact(value),
            ArgSpec::Matcher(matcher) => matcher,
            // Guarded against in build().
            ArgSpec::Rest => Matcher::Any,
        }
    }

    /// Check whether this pattern is the rest-wildcard pattern.
    pub fn is_rest(&self) -> bool {
        self.positional == Positional::Rest
    }

    /// Evaluate the pattern against an actual call.
    ///
    /// A mismatch is `Ok(false)`; only a structurally unmatchable value
    /// under a list matcher produces an error.
    pub fn matches(&self, args: &CallArgs) -> Result<bool> {
        let matchers = match &self.positional {
            Positional::Rest => return Ok(true),
            Positional::Matchers(matchers) => matchers,
        };
        if matchers.len() != args.positional.len() {
            return Ok(false);
        }
        if !self.keywords.keys().eq(args.keywords.keys()) {
            return Ok(false);
        }
        for (matcher, value) in matchers.iter().zip(&args.positional) {
            if !matcher.matches(value)? {
                return Ok(false);
            }
        }
        for (name, matcher) in &self.keywords {
            if !matcher.matches(&args.keywords[name])? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for CallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = match &self.positional {
            Positional::Rest => vec!["<< ANY_VALUES >>".to_string()],
            Positional::Matchers(matchers) => matchers.iter().map(Matcher::describe).collect(),
        };
        parts.extend(
            self.keywords
                .iter()
                .map(|(name, matcher)| format!("{name}={}", matcher.describe())),
        );
        f.write_str(&parts.join(", "))
    }
}
