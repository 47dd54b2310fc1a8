//! Expectations and the verification engine.
//!
//! Verification is a read-only scan of the call ledger: filter the
//! records for one (target, attribute), count the ones the pattern
//! accepts, and compare the count against the expectation. A failure
//! carries structured diff data and renders to text only at the
//! `Display` boundary.

use crate::error::{Result, StandinError};
use crate::ledger::CallLedger;
use crate::pattern::CallPattern;
use crate::target::TargetId;
use std::fmt;

/// How often the expected call must have happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// At least one matching call (the default).
    AtLeastOnce,
    /// No matching call at all.
    Never,
    /// Exactly this many matching calls. Negative counts are rejected at
    /// verification time.
    Times(i64),
}

/// The default expectation: at least one matching call.
pub const AT_LEAST_ONCE: Expectation = Expectation::AtLeastOnce;

/// Expectation that the call never happened.
pub const NEVER: Expectation = Expectation::Never;

impl From<i64> for Expectation {
    fn from(count: i64) -> Self {
        Self::Times(count)
    }
}

impl From<i32> for Expectation {
    fn from(count: i32) -> Self {
        Self::Times(i64::from(count))
    }
}

impl Expectation {
    /// Reject structurally invalid expectations.
    pub(crate) fn validate(self) -> Result<()> {
        match self {
            Self::Times(count) if count < 0 => Err(StandinError::InvalidExpectation(format!(
                "a call count cannot be negative, got {count}"
            ))),
            _ => Ok(()),
        }
    }

    fn accepts(self, count: usize) -> bool {
        match self {
            Self::AtLeastOnce => count >= 1,
            Self::Never => count == 0,
            Self::Times(expected) => count as i64 == expected,
        }
    }

    /// Fixed description used verbatim in failure reports.
    pub fn describe(self) -> String {
        match self {
            Self::AtLeastOnce => "<< at least once >>".to_string(),
            Self::Never => "<< should never be called >>".to_string(),
            Self::Times(count) => format!("<< exactly {count} times >>"),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A verification that did not hold.
///
/// Carries the expected-call description, the expectation description,
/// and the chronological renderings of every recorded call to the
/// verified (target, attribute) — empty when nothing was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    /// Rendered expected call, e.g. `call calculator.add(2, 3)`.
    pub expected_call: String,
    /// Rendered expectation, e.g. `<< at least once >>`.
    pub expectation: String,
    /// Every recorded call to the verified (target, attribute), in call
    /// order, regardless of whether it matched.
    pub actual_calls: Vec<String>,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Expected: {} {}", self.expected_call, self.expectation)?;
        if self.actual_calls.is_empty() {
            writeln!(f, "  Reason: no calls have been recorded")?;
        } else {
            let mut calls = self.actual_calls.iter();
            if let Some(first) = calls.next() {
                writeln!(f, " but was: {first}")?;
            }
            for call in calls {
                writeln!(f, "          {call}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for VerificationFailure {}

/// Count matching ledger records and compare against the expectation.
///
/// Read-only over the ledger: a failed verification mutates nothing and
/// repeating a successful one is free of side effects.
pub(crate) fn check_expectation(
    ledger: &CallLedger,
    target: &TargetId,
    attribute: &str,
    pattern: &CallPattern,
    expectation: Expectation,
) -> Result<()> {
    expectation.validate()?;

    let records = ledger.records_for(target, attribute);
    let mut matched = 0usize;
    for record in &records {
        if pattern.matches(&record.args)? {
            matched += 1;
        }
    }

    if expectation.accepts(matched) {
        return Ok(());
    }

    Err(StandinError::from(VerificationFailure {
        expected_call: format!("call {target}.{attribute}({pattern})"),
        expectation: expectation.describe(),
        actual_calls: records.iter().map(ToString::to_string).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CallArgs;
    use crate::{args, values};

    fn target() -> TargetId {
        TargetId::Namespace {
            name: "targetpackage".to_string(),
        }
    }

    fn pattern(list: crate::pattern::ArgList) -> CallPattern {
        CallPattern::build(list).unwrap()
    }

    #[test]
    fn expectation_descriptions() {
        assert_eq!(AT_LEAST_ONCE.describe(), "<< at least once >>");
        assert_eq!(NEVER.describe(), "<< should never be called >>");
        assert_eq!(Expectation::Times(5).describe(), "<< exactly 5 times >>");
    }

    #[test]
    fn negative_counts_are_invalid() {
        let ledger = CallLedger::new();
        let err = check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![]),
            Expectation::Times(-1),
        )
        .unwrap_err();
        assert!(matches!(err, StandinError::InvalidExpectation(_)));
    }

    #[test]
    fn at_least_once_passes_with_a_matching_call() {
        let ledger = CallLedger::new();
        ledger.record(target(), "targetfunction", CallArgs::positional(values![2]));

        check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![2]),
            AT_LEAST_ONCE,
        )
        .unwrap();
    }

    #[test]
    fn never_fails_once_a_call_happened() {
        let ledger = CallLedger::new();
        ledger.record(target(), "targetfunction", CallArgs::none());

        let err = check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![]),
            NEVER,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\nExpected: call targetpackage.targetfunction() << should never be called >>\n \
             but was: call targetpackage.targetfunction()\n"
        );
    }

    #[test]
    fn exact_count_compares_matching_calls_only() {
        let ledger = CallLedger::new();
        ledger.record(target(), "targetfunction", CallArgs::positional(values![2]));
        ledger.record(target(), "targetfunction", CallArgs::positional(values![9]));
        ledger.record(target(), "targetfunction", CallArgs::positional(values![2]));

        check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![2]),
            Expectation::Times(2),
        )
        .unwrap();
    }

    #[test]
    fn failure_without_any_recorded_call_reports_the_reason() {
        let ledger = CallLedger::new();
        let err = check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![1]),
            AT_LEAST_ONCE,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\nExpected: call targetpackage.targetfunction(1) << at least once >>\n  \
             Reason: no calls have been recorded\n"
        );
    }

    #[test]
    fn failure_lists_actual_calls_in_call_order() {
        let ledger = CallLedger::new();
        ledger.record(target(), "targetfunction", CallArgs::positional(values![2, 1]));
        ledger.record(
            target(),
            "targetfunction",
            CallArgs::positional(values!["abc", 123, true]),
        );

        let err = check_expectation(
            &ledger,
            &target(),
            "targetfunction",
            &pattern(args![1, 2]),
            AT_LEAST_ONCE,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\nExpected: call targetpackage.targetfunction(1, 2) << at least once >>\n \
             but was: call targetpackage.targetfunction(2, 1)\n          \
             call targetpackage.targetfunction(\"abc\", 123, true)\n"
        );
    }

    #[test]
    fn verification_reads_only() {
        let ledger = CallLedger::new();
        ledger.record(target(), "targetfunction", CallArgs::positional(values![2]));

        for _ in 0..2 {
            check_expectation(
                &ledger,
                &target(),
                "targetfunction",
                &pattern(args![2]),
                AT_LEAST_ONCE,
            )
            .unwrap();
        }
        assert_eq!(ledger.len(), 1);
    }
}
