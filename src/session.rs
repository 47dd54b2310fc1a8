//! Session: the shared context behind `when`, `verify`, and `reset`.
//!
//! A [`Session`] owns the replacement registry and the call ledger. Most
//! test code talks to the lazily-initialized process-wide default
//! session through the free functions; the explicit form exists for
//! isolated use and for testing the engine itself.
//!
//! # Example
//!
//! ```
//! use standin::{args, values, CallArgs, Namespace, Session, Value, AT_LEAST_ONCE};
//! use std::sync::Arc;
//!
//! let calculator = Arc::new(Namespace::new("calculator").with_function("add", |_| {
//!     Ok(Some(Value::string("real")))
//! }));
//! let target: standin::TargetRef = calculator.clone();
//!
//! let session = Session::new();
//! session.when(&target, "add")?.called_with(args![2, 3])?.then_return(5);
//!
//! let out = calculator.invoke("add", CallArgs::positional(values![2, 3]))?;
//! assert_eq!(out, Some(Value::int(5)));
//!
//! session.verify(&target, AT_LEAST_ONCE)?.that("add")?.called_with(args![2, 3])?;
//! session.reset();
//! # Ok::<(), standin::StandinError>(())
//! ```

use crate::answer::{Answer, AnswerQueue, Fault};
use crate::error::{Result, StandinError};
use crate::ledger::CallLedger;
use crate::pattern::{ArgList, CallPattern};
use crate::registry::ReplacementRegistry;
use crate::replacement::Replacement;
use crate::target::{TargetId, TargetRef};
use crate::value::Value;
use crate::verify::{check_expectation, Expectation};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

/// Owns the registry of active replacements and the call ledger.
pub struct Session {
    registry: ReplacementRegistry,
    ledger: Arc<CallLedger>,
}

impl Session {
    /// Create an isolated session.
    pub fn new() -> Self {
        Self {
            registry: ReplacementRegistry::new(),
            ledger: Arc::new(CallLedger::new()),
        }
    }

    /// Begin stubbing an attribute of a target.
    ///
    /// Installs the stand-in on first use for this (target, attribute);
    /// later calls accumulate configurations on the same stand-in.
    /// Fails eagerly when the target lacks the attribute.
    pub fn when(&self, target: &TargetRef, attribute: &str) -> Result<Stubbing> {
        let standin = self.registry.get_or_create(target, attribute, &self.ledger)?;
        Ok(Stubbing { standin })
    }

    /// Begin verifying calls to a target.
    ///
    /// The expectation accepts [`crate::AT_LEAST_ONCE`] (the default in
    /// spirit), [`crate::NEVER`], or an exact call count; negative counts
    /// are rejected here.
    pub fn verify(
        &self,
        target: &TargetRef,
        expectation: impl Into<Expectation>,
    ) -> Result<Verification<'_>> {
        let expectation = expectation.into();
        expectation.validate()?;
        Ok(Verification {
            session: self,
            target: Arc::clone(target),
            expectation,
        })
    }

    /// Revert every active replacement and clear the ledger.
    ///
    /// Intended for test teardown; idempotent and safe to call with no
    /// replacements active.
    pub fn reset(&self) {
        self.registry.reset();
        self.ledger.clear();
        tracing::info!("session reset");
    }

    /// Identities of all active replacements; empty immediately after
    /// [`Session::reset`].
    pub fn active_replacements(&self) -> Vec<(TargetId, String)> {
        self.registry.active()
    }

    /// The session's call ledger.
    pub fn ledger(&self) -> &CallLedger {
        &self.ledger
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration handle for one (target, attribute).
#[derive(Debug)]
pub struct Stubbing {
    standin: Arc<Replacement>,
}

impl Stubbing {
    /// Record a call pattern and return the answer builder for it.
    ///
    /// The rest-wildcard placement rule applies here, at configuration
    /// time.
    pub fn called_with(&self, args: impl Into<ArgList>) -> Result<AnswerBuilder> {
        let pattern = CallPattern::build(args.into())?;
        Ok(AnswerBuilder {
            queue: self.standin.configure(pattern),
        })
    }

    /// Record the zero-argument call pattern.
    pub fn called(&self) -> Result<AnswerBuilder> {
        self.called_with(ArgList::new())
    }
}

/// Chainable builder queuing answers for one configured pattern.
#[derive(Debug)]
pub struct AnswerBuilder {
    queue: Arc<Mutex<AnswerQueue>>,
}

impl AnswerBuilder {
    /// Queue a return value for the next matched call.
    pub fn then_return(self, value: impl Into<Value>) -> Self {
        self.queue.lock().push(Answer::Returns(value.into()));
        self
    }

    /// Queue a raised fault for the next matched call.
    pub fn then_raise(self, fault: Fault) -> Self {
        self.queue.lock().push(Answer::Raises(fault));
        self
    }
}

/// Verification handle bound to a target and an expectation.
pub struct Verification<'a> {
    session: &'a Session,
    target: TargetRef,
    expectation: Expectation,
}

impl std::fmt::Debug for Verification<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verification")
            .field("target", &self.target.identity())
            .field("expectation", &self.expectation)
            .finish()
    }
}

impl<'a> Verification<'a> {
    /// Select the attribute to verify.
    ///
    /// Fails eagerly when the target lacks the attribute.
    pub fn that(self, attribute: &str) -> Result<VerificationCall<'a>> {
        if !self.target.has_attribute(attribute) {
            return Err(StandinError::InvalidAttribute {
                target: self.target.identity().to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(VerificationCall {
            session: self.session,
            identity: self.target.identity(),
            attribute: attribute.to_string(),
            expectation: self.expectation,
        })
    }
}

/// Attribute-bound verification; executing it scans the ledger.
pub struct VerificationCall<'a> {
    session: &'a Session,
    identity: TargetId,
    attribute: String,
    expectation: Expectation,
}

impl std::fmt::Debug for VerificationCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCall")
            .field("identity", &self.identity)
            .field("attribute", &self.attribute)
            .field("expectation", &self.expectation)
            .finish()
    }
}

impl VerificationCall<'_> {
    /// Verify against the given argument pattern.
    pub fn called_with(self, args: impl Into<ArgList>) -> Result<()> {
        let pattern = CallPattern::build(args.into())?;
        check_expectation(
            self.session.ledger(),
            &self.identity,
            &self.attribute,
            &pattern,
            self.expectation,
        )
    }

    /// Verify against the zero-argument pattern.
    pub fn called(self) -> Result<()> {
        self.called_with(ArgList::new())
    }
}

static DEFAULT_SESSION: OnceLock<Session> = OnceLock::new();

/// The process-wide default session, lazily initialized on first access.
pub fn default_session() -> &'static Session {
    DEFAULT_SESSION.get_or_init(Session::new)
}

/// Begin stubbing on the default session. See [`Session::when`].
pub fn when(target: &TargetRef, attribute: &str) -> Result<Stubbing> {
    default_session().when(target, attribute)
}

/// Begin verifying on the default session. See [`Session::verify`].
pub fn verify(
    target: &TargetRef,
    expectation: impl Into<Expectation>,
) -> Result<Verification<'static>> {
    default_session().verify(target, expectation)
}

/// Reset the default session. See [`Session::reset`].
pub fn reset() {
    default_session().reset();
}

/// Active replacements of the default session.
pub fn active_replacements() -> Vec<(TargetId, String)> {
    default_session().active_replacements()
}

/// Calls `reset()` on the borrowed session when dropped.
///
/// ```
/// use standin::{Session, SessionGuard};
///
/// let session = Session::new();
/// {
///     let _guard = SessionGuard::new(&session);
///     // ... stub, call, verify ...
/// }
/// assert!(session.active_replacements().is_empty());
/// ```
pub struct SessionGuard<'a> {
    session: &'a Session,
}

impl<'a> SessionGuard<'a> {
    /// Guard an explicit session.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Guard the process-wide default session.
    pub fn default_session() -> SessionGuard<'static> {
        SessionGuard {
            session: default_session(),
        }
    }

    /// The guarded session.
    pub fn session(&self) -> &'a Session {
        self.session
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CallArgs;
    use crate::matcher::ANY_VALUE;
    use crate::target::Namespace;
    use crate::verify::{AT_LEAST_ONCE, NEVER};
    use crate::{args, values};

    fn fixture() -> (Arc<Namespace>, TargetRef, Session) {
        let ns = Arc::new(
            Namespace::new("targetpackage")
                .with_function("targetfunction", |_| Ok(Some(Value::string("original")))),
        );
        let target: TargetRef = ns.clone();
        (ns, target, Session::new())
    }

    #[test]
    fn when_rejects_unknown_attributes() {
        let (_ns, target, session) = fixture();
        let err = session.when(&target, "spameggs").unwrap_err();
        assert!(matches!(err, StandinError::InvalidAttribute { .. }));
    }

    #[test]
    fn stubbed_answer_round_trip() {
        let (ns, target, session) = fixture();
        session
            .when(&target, "targetfunction")
            .unwrap()
            .called_with(args![2])
            .unwrap()
            .then_return(3);

        let out = ns
            .invoke("targetfunction", CallArgs::positional(values![2]))
            .unwrap();
        assert_eq!(out, Some(Value::int(3)));

        session
            .verify(&target, AT_LEAST_ONCE)
            .unwrap()
            .that("targetfunction")
            .unwrap()
            .called_with(args![2])
            .unwrap();
        session.reset();
    }

    #[test]
    fn verify_rejects_unknown_attributes() {
        let (_ns, target, session) = fixture();
        let err = session
            .verify(&target, AT_LEAST_ONCE)
            .unwrap()
            .that("spameggs")
            .unwrap_err();
        assert!(matches!(err, StandinError::InvalidAttribute { .. }));
    }

    #[test]
    fn verify_rejects_negative_counts_eagerly() {
        let (_ns, target, session) = fixture();
        let err = session.verify(&target, -2).unwrap_err();
        assert!(matches!(err, StandinError::InvalidExpectation(_)));
    }

    #[test]
    fn never_expectation_round_trip() {
        let (ns, target, session) = fixture();
        session.when(&target, "targetfunction").unwrap();

        session
            .verify(&target, NEVER)
            .unwrap()
            .that("targetfunction")
            .unwrap()
            .called()
            .unwrap();

        ns.invoke("targetfunction", CallArgs::none()).unwrap();
        let err = session
            .verify(&target, NEVER)
            .unwrap()
            .that("targetfunction")
            .unwrap()
            .called()
            .unwrap_err();
        assert!(matches!(err, StandinError::Verification(_)));
        session.reset();
    }

    #[test]
    fn reset_clears_replacements_ledger_and_restores_behavior() {
        let (ns, target, session) = fixture();
        session
            .when(&target, "targetfunction")
            .unwrap()
            .called_with(args![ANY_VALUE])
            .unwrap()
            .then_return("stubbed");
        ns.invoke("targetfunction", CallArgs::positional(values![1]))
            .unwrap();
        assert_eq!(session.active_replacements().len(), 1);

        session.reset();

        assert!(session.active_replacements().is_empty());
        assert!(session.ledger().is_empty());
        let out = ns.invoke("targetfunction", CallArgs::none()).unwrap();
        assert_eq!(out, Some(Value::string("original")));
    }

    #[test]
    fn guard_resets_on_drop() {
        let (_ns, target, session) = fixture();
        {
            let guard = SessionGuard::new(&session);
            guard
                .session()
                .when(&target, "targetfunction")
                .unwrap()
                .called()
                .unwrap()
                .then_return(1);
            assert_eq!(session.active_replacements().len(), 1);
        }
        assert!(session.active_replacements().is_empty());
    }

    #[test]
    fn repeated_when_accumulates_on_one_standin() {
        let (ns, target, session) = fixture();
        session
            .when(&target, "targetfunction")
            .unwrap()
            .called_with(args![1])
            .unwrap()
            .then_return("one");
        session
            .when(&target, "targetfunction")
            .unwrap()
            .called_with(args![2])
            .unwrap()
            .then_return("two");

        assert_eq!(session.active_replacements().len(), 1);
        let one = ns
            .invoke("targetfunction", CallArgs::positional(values![1]))
            .unwrap();
        let two = ns
            .invoke("targetfunction", CallArgs::positional(values![2]))
            .unwrap();
        assert_eq!(one, Some(Value::string("one")));
        assert_eq!(two, Some(Value::string("two")));
        session.reset();
    }
}
