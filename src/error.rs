//! Error types for the interception and verification engine.
//!
//! A closed taxonomy: configuration-time errors (`InvalidAttribute`,
//! `InvalidWildcardUsage`), match-time errors (`Matcher`), verification
//! failures with structured diff data (`Verification`), and programmed
//! faults surfacing through an intercepted call (`Raised`). All of these
//! are raised synchronously to the caller and never caught internally.

use crate::answer::Fault;
use crate::verify::VerificationFailure;
use thiserror::Error;

/// The main error type for stand-in operations.
#[derive(Error, Debug)]
pub enum StandinError {
    /// The target does not expose the named attribute. Raised eagerly at
    /// configuration or verification time, never deferred to invocation.
    #[error("The target \"{target}\" has no attribute called \"{attribute}\".")]
    InvalidAttribute {
        /// Rendered identity of the target.
        target: String,
        /// The attribute that was looked up.
        attribute: String,
    },

    /// The rest-wildcard was combined with other arguments.
    #[error(
        "Do not use ANY_VALUES together with other arguments! \
         Use ANY_VALUE as a wildcard for single arguments."
    )]
    InvalidWildcardUsage,

    /// A matcher was constructed with invalid parameters or asked to
    /// evaluate a value it structurally cannot handle.
    #[error("Matcher error: {0}")]
    Matcher(String),

    /// An invalid expectation was passed to `verify`.
    #[error("Invalid expectation: {0}")]
    InvalidExpectation(String),

    /// A verification did not hold; carries the expected-call description
    /// and the chronological actual calls, rendered at the display
    /// boundary.
    #[error(transparent)]
    Verification(Box<VerificationFailure>),

    /// A programmed `then_raise` answer fired for a matched call.
    #[error(transparent)]
    Raised(#[from] Fault),
}

impl From<VerificationFailure> for StandinError {
    fn from(failure: VerificationFailure) -> Self {
        Self::Verification(Box::new(failure))
    }
}

/// Result type alias using [`StandinError`].
pub type Result<T> = std::result::Result<T, StandinError>;
