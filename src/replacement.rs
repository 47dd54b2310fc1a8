//! The programmable stand-in installed in place of an original attribute.
//!
//! One [`Replacement`] exists per (target, attribute). Every invocation is
//! recorded to the shared ledger first; then the configured
//! (pattern, answer queue) pairs are scanned in configuration order and
//! the first matching pattern answers. A call matching no pattern is not
//! an error — it returns nothing and stays visible only in the ledger.

use crate::answer::{Answer, AnswerQueue};
use crate::error::Result;
use crate::ledger::{CallArgs, CallLedger};
use crate::pattern::CallPattern;
use crate::target::{TargetId, UndoHandle};
use crate::value::Value;
use parking_lot::Mutex;
use std::sync::Arc;

struct Program {
    pattern: CallPattern,
    queue: Arc<Mutex<AnswerQueue>>,
}

/// The callable stand-in for one (target, attribute).
pub struct Replacement {
    target: TargetId,
    attribute: String,
    ledger: Arc<CallLedger>,
    programs: Mutex<Vec<Program>>,
    undo: Mutex<Option<UndoHandle>>,
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacement")
            .field("target", &self.target)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

impl Replacement {
    pub(crate) fn new(target: TargetId, attribute: impl Into<String>, ledger: Arc<CallLedger>) -> Self {
        Self {
            target,
            attribute: attribute.into(),
            ledger,
            programs: Mutex::new(Vec::new()),
            undo: Mutex::new(None),
        }
    }

    /// Identity of the replaced target.
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// Name of the replaced attribute.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub(crate) fn attach_undo(&self, undo: UndoHandle) {
        *self.undo.lock() = Some(undo);
    }

    pub(crate) fn take_undo(&self) -> Option<UndoHandle> {
        self.undo.lock().take()
    }

    /// Append a (pattern, answer queue) pair and return the queue for
    /// `then_return`/`then_raise` chaining.
    ///
    /// Re-configuring the exact same pattern replaces that pair's queue
    /// with a fresh one, so the newest configuration wins and stale
    /// answers can never fire.
    pub(crate) fn configure(&self, pattern: CallPattern) -> Arc<Mutex<AnswerQueue>> {
        let mut programs = self.programs.lock();
        let queue = Arc::new(Mutex::new(AnswerQueue::new()));
        if let Some(existing) = programs.iter_mut().find(|p| p.pattern == pattern) {
            tracing::debug!(
                target_id = %self.target,
                attribute = %self.attribute,
                "replacing previously configured pattern"
            );
            existing.queue = Arc::clone(&queue);
        } else {
            programs.push(Program {
                pattern,
                queue: Arc::clone(&queue),
            });
        }
        queue
    }

    /// Handle one invocation of the replaced attribute.
    pub fn invoke(&self, args: CallArgs) -> Result<Option<Value>> {
        self.ledger
            .record(self.target.clone(), &self.attribute, args.clone());

        let programs = self.programs.lock();
        for program in programs.iter() {
            if program.pattern.matches(&args)? {
                return match program.queue.lock().next_answer() {
                    None => Ok(None),
                    Some(Answer::Returns(value)) => Ok(Some(value)),
                    Some(Answer::Raises(fault)) => Err(fault.into()),
                };
            }
        }
        Ok(None)
    }

    /// Number of configured patterns.
    pub fn configured_patterns(&self) -> usize {
        self.programs.lock().len()
    }
}
