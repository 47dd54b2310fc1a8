//! Call history: records and the append-only ledger.
//!
//! Every invocation of an installed stand-in appends one [`CallRecord`]
//! to the shared [`CallLedger`], whether or not any configured pattern
//! matched. Verification reads the ledger; `reset()` clears it.

use crate::target::TargetId;
use crate::value::Value;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The positional and keyword arguments of one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallArgs {
    /// Positional arguments, in call order.
    pub positional: Vec<Value>,
    /// Keyword arguments by name.
    pub keywords: BTreeMap<String, Value>,
}

impl CallArgs {
    /// A call with no arguments.
    pub fn none() -> Self {
        Self::default()
    }

    /// A call with the given positional arguments.
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            keywords: BTreeMap::new(),
        }
    }

    /// Add a keyword argument.
    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.positional.iter().map(Value::render).collect();
        parts.extend(
            self.keywords
                .iter()
                .map(|(name, value)| format!("{name}={}", value.render())),
        );
        f.write_str(&parts.join(", "))
    }
}

/// One recorded invocation of a replaced attribute.
///
/// Immutable once appended; the ledger owns all records.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    /// Identity of the target that was called.
    pub target: TargetId,
    /// The attribute that was called.
    pub attribute: String,
    /// The arguments of the call.
    pub args: CallArgs,
    /// Monotonically increasing sequence id.
    pub sequence: u64,
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call {}.{}({})", self.target, self.attribute, self.args)
    }
}

/// Append-only history of all stand-in invocations in a session.
#[derive(Debug, Default)]
pub struct CallLedger {
    records: RwLock<Vec<CallRecord>>,
    next_sequence: AtomicU64,
}

impl CallLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning the next sequence id.
    pub(crate) fn record(&self, target: TargetId, attribute: &str, args: CallArgs) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        self.records.write().push(CallRecord {
            target,
            attribute: attribute.to_string(),
            args,
            sequence,
        });
        sequence
    }

    /// All records, in call order.
    pub fn records(&self) -> Vec<CallRecord> {
        self.records.read().clone()
    }

    /// Records for one (target, attribute), preserving call order.
    pub fn records_for(&self, target: &TargetId, attribute: &str) -> Vec<CallRecord> {
        self.records
            .read()
            .iter()
            .filter(|record| record.target == *target && record.attribute == attribute)
            .cloned()
            .collect()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if no calls have been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Clear all records.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Export the full history as JSON, for diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&*self.records.read()).expect("Failed to serialize records")
    }
}
