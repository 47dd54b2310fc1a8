//! Fluent call interception and verification for test suites.
//!
//! `standin` lets a test replace a named attribute of a target with a
//! programmable stand-in, program what it returns or raises for given
//! argument patterns, assert on how it was invoked, and restore the
//! original afterward.
//!
//! # Key components
//!
//! - **Targets**: [`Namespace`] and [`Instance`] reference targets, or any
//!   type implementing [`Target`]
//! - **Matchers**: exact values, wildcards ([`ANY_VALUE`], [`ANY_VALUES`]),
//!   typed and structural matchers ([`contains`], [`a_list_containing`],
//!   [`any_of`])
//! - **Sessions**: the [`Session`] context owning the replacement registry
//!   and the call ledger, with a process-wide default behind [`when()`],
//!   [`verify()`], and [`reset()`]
//!
//! # Example
//!
//! ```
//! use standin::{args, values, CallArgs, Namespace, Value, AT_LEAST_ONCE};
//! use std::sync::Arc;
//!
//! let calculator = Arc::new(Namespace::new("calculator").with_function("add", |_| {
//!     Ok(Some(Value::string("real")))
//! }));
//! let target: standin::TargetRef = calculator.clone();
//!
//! // Program the stand-in.
//! standin::when(&target, "add")?
//!     .called_with(args![2, 3])?
//!     .then_return(5);
//!
//! // The call routes through the stand-in.
//! let out = calculator.invoke("add", CallArgs::positional(values![2, 3]))?;
//! assert_eq!(out, Some(Value::int(5)));
//!
//! // Verify and restore.
//! standin::verify(&target, AT_LEAST_ONCE)?.that("add")?.called_with(args![2, 3])?;
//! standin::reset();
//! # Ok::<(), standin::StandinError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod pattern;
pub mod prelude;
pub mod registry;
pub mod replacement;
pub mod session;
pub mod target;
pub mod value;
pub mod verify;

// Re-export key types at crate root for convenience
pub use answer::{Answer, AnswerQueue, Fault};
pub use error::{Result, StandinError};
pub use ledger::{CallArgs, CallLedger, CallRecord};
pub use matcher::{
    a_list_containing, any_of, any_value_of_type, contains, Matcher, ANY_BOOLEAN, ANY_FLOAT,
    ANY_INTEGER, ANY_LIST, ANY_MAP, ANY_STRING, ANY_VALUE,
};
pub use pattern::{ArgList, ArgSpec, CallPattern, ANY_VALUES};
pub use registry::ReplacementRegistry;
pub use replacement::Replacement;
pub use session::{
    active_replacements, default_session, reset, verify, when, AnswerBuilder, Session,
    SessionGuard, Stubbing, Verification, VerificationCall,
};
pub use target::{AttributeFn, Instance, Namespace, Target, TargetId, TargetRef, UndoHandle};
pub use value::{Value, ValueType};
pub use verify::{Expectation, VerificationFailure, AT_LEAST_ONCE, NEVER};
