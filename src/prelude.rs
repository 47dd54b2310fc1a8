//! Prelude for convenient imports.
//!
//! This module re-exports the most commonly used types, constants, and
//! entry points.
//!
//! # Example
//!
//! ```ignore
//! use standin::prelude::*;
//! ```

// Entry points
pub use crate::session::{
    active_replacements, default_session, reset, verify, when, AnswerBuilder, Session,
    SessionGuard, Stubbing, Verification, VerificationCall,
};

// Values and arguments
pub use crate::ledger::{CallArgs, CallLedger, CallRecord};
pub use crate::pattern::{ArgList, ArgSpec, CallPattern, ANY_VALUES};
pub use crate::value::{Value, ValueType};

// Matchers
pub use crate::matcher::{
    a_list_containing, any_of, any_value_of_type, contains, Matcher, ANY_BOOLEAN, ANY_FLOAT,
    ANY_INTEGER, ANY_LIST, ANY_MAP, ANY_STRING, ANY_VALUE,
};

// Answers
pub use crate::answer::{Answer, AnswerQueue, Fault};

// Verification
pub use crate::verify::{Expectation, VerificationFailure, AT_LEAST_ONCE, NEVER};

// Targets
pub use crate::target::{AttributeFn, Instance, Namespace, Target, TargetId, TargetRef, UndoHandle};

// Error handling
pub use crate::error::{Result, StandinError};
