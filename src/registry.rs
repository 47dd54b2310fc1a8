//! Process-wide table of active replacements.
//!
//! At most one physical interception exists per (target, attribute):
//! repeated `when(target, attribute)` calls accumulate configurations on
//! the one live [`Replacement`]. `reset()` reverts everything best-effort —
//! a failed revert neither stops the remaining reverts nor leaves the
//! key blocked for reconfiguration.

use crate::error::{Result, StandinError};
use crate::ledger::CallLedger;
use crate::replacement::Replacement;
use crate::target::{TargetId, TargetRef, UndoHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Table mapping (target identity, attribute name) to the live stand-in.
#[derive(Default)]
pub struct ReplacementRegistry {
    entries: Mutex<HashMap<(TargetId, String), Arc<Replacement>>>,
}

impl ReplacementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the stand-in for (target, attribute), installing one on
    /// first use.
    ///
    /// Validates eagerly that the target exposes the attribute; a miss is
    /// [`StandinError::InvalidAttribute`] and nothing is installed.
    pub fn get_or_create(
        &self,
        target: &TargetRef,
        attribute: &str,
        ledger: &Arc<CallLedger>,
    ) -> Result<Arc<Replacement>> {
        let identity = target.identity();
        let key = (identity.clone(), attribute.to_string());

        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }

        if !target.has_attribute(attribute) {
            return Err(StandinError::InvalidAttribute {
                target: identity.to_string(),
                attribute: attribute.to_string(),
            });
        }

        let standin = Arc::new(Replacement::new(identity.clone(), attribute, Arc::clone(ledger)));
        let hook = Arc::clone(&standin);
        let original =
            target.swap_attribute(attribute, Arc::new(move |args| hook.invoke(args.clone())))?;
        standin.attach_undo(UndoHandle::new(Arc::clone(target), attribute, original));
        tracing::debug!(target_id = %identity, attribute, "installed replacement");

        entries.insert(key, Arc::clone(&standin));
        Ok(standin)
    }

    /// Revert every replacement and clear the table.
    ///
    /// Idempotent; safe with no active replacements. Revert is
    /// best-effort per entry.
    pub fn reset(&self) {
        let drained: Vec<_> = {
            let mut entries = self.entries.lock();
            entries.drain().collect()
        };
        for ((identity, attribute), standin) in drained {
            if let Some(undo) = standin.take_undo() {
                if let Err(error) = undo.revert() {
                    tracing::warn!(
                        target_id = %identity,
                        attribute = %attribute,
                        %error,
                        "failed to revert replacement"
                    );
                }
            }
        }
    }

    /// Identities of all active replacements.
    pub fn active(&self) -> Vec<(TargetId, String)> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Number of active replacements.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if no replacements are active.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
