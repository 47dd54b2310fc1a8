//! Targets, identities, and the attribute-replacement seam.
//!
//! A target is anything with named callable attributes: a module-like
//! [`Namespace`] or an object-like [`Instance`]. The engine only needs
//! the narrow [`Target`] capability — a stable identity, attribute
//! existence checks, and `swap_attribute` — so consumers can implement
//! it for their own seams. [`UndoHandle`] remembers the original
//! callable and restores it on revert.

use crate::error::{Result, StandinError};
use crate::ledger::CallArgs;
use crate::value::Value;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A callable attribute: takes the call's arguments, returns the answer
/// value (or nothing), or raises.
pub type AttributeFn = Arc<dyn Fn(&CallArgs) -> Result<Option<Value>> + Send + Sync>;

/// Shared handle to a target.
pub type TargetRef = Arc<dyn Target>;

/// Stable, comparable identity of a target.
///
/// Two handles referring to the same underlying object compare equal
/// even when constructed independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetId {
    /// A module-like namespace, identified by name.
    Namespace {
        /// The namespace name.
        name: String,
    },
    /// An arbitrary object, identified by its type name and runtime id.
    Instance {
        /// Qualified name of the object's type.
        type_name: String,
        /// Runtime identity of the object.
        instance_id: u64,
    },
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace { name } => f.write_str(name),
            Self::Instance { type_name, .. } => f.write_str(type_name),
        }
    }
}

/// The capability the engine needs from a target.
pub trait Target: Send + Sync {
    /// The target's stable identity.
    fn identity(&self) -> TargetId;

    /// Check whether the target exposes the named attribute.
    fn has_attribute(&self, attribute: &str) -> bool;

    /// Swap the named attribute for `replacement`, returning the previous
    /// callable. Fails if the attribute does not exist.
    fn swap_attribute(&self, attribute: &str, replacement: AttributeFn) -> Result<AttributeFn>;
}

/// Remembers the original attribute of one replacement and restores it.
pub struct UndoHandle {
    target: TargetRef,
    attribute: String,
    original: AttributeFn,
}

impl UndoHandle {
    pub(crate) fn new(target: TargetRef, attribute: impl Into<String>, original: AttributeFn) -> Self {
        Self {
            target,
            attribute: attribute.into(),
            original,
        }
    }

    /// Restore the original attribute on the target.
    pub fn revert(&self) -> Result<()> {
        self.target
            .swap_attribute(&self.attribute, Arc::clone(&self.original))
            .map(|_| ())
    }
}

impl fmt::Debug for UndoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHandle")
            .field("target", &self.target.identity())
            .field("attribute", &self.attribute)
            .finish()
    }
}

/// Named callable slots shared by the reference target implementations.
#[derive(Default)]
struct AttributeTable {
    entries: RwLock<HashMap<String, AttributeFn>>,
}

impl AttributeTable {
    fn insert(&self, attribute: String, function: AttributeFn) {
        self.entries.write().insert(attribute, function);
    }

    fn contains(&self, attribute: &str) -> bool {
        self.entries.read().contains_key(attribute)
    }

    fn fetch(&self, attribute: &str) -> Option<AttributeFn> {
        self.entries.read().get(attribute).cloned()
    }

    fn swap(&self, owner: &TargetId, attribute: &str, replacement: AttributeFn) -> Result<AttributeFn> {
        let mut entries = self.entries.write();
        match entries.get_mut(attribute) {
            Some(slot) => Ok(std::mem::replace(slot, replacement)),
            None => Err(StandinError::InvalidAttribute {
                target: owner.to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }
}

/// A module-like target: a named table of callable attributes.
///
/// # Example
///
/// ```
/// use standin::{CallArgs, Namespace, Value};
/// use std::sync::Arc;
///
/// let calculator = Arc::new(Namespace::new("calculator").with_function("add", |args| {
///     let sum: i64 = args
///         .positional
///         .iter()
///         .filter_map(|v| v.inner().as_i64())
///         .sum();
///     Ok(Some(Value::int(sum)))
/// }));
///
/// let out = calculator.invoke("add", CallArgs::positional(standin::values![2, 3])).unwrap();
/// assert_eq!(out, Some(Value::int(5)));
/// ```
pub struct Namespace {
    name: String,
    table: AttributeTable,
}

impl Namespace {
    /// Create an empty namespace with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: AttributeTable::default(),
        }
    }

    /// Builder form of [`Namespace::register`].
    #[must_use]
    pub fn with_function<F>(self, attribute: impl Into<String>, function: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.register(attribute, function);
        self
    }

    /// Register a callable attribute.
    pub fn register<F>(&self, attribute: impl Into<String>, function: F)
    where
        F: Fn(&CallArgs) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.table.insert(attribute.into(), Arc::new(function));
    }

    /// Call an attribute with the given arguments.
    ///
    /// Routes through the installed stand-in when one is active.
    pub fn invoke(&self, attribute: &str, args: CallArgs) -> Result<Option<Value>> {
        let function = self
            .table
            .fetch(attribute)
            .ok_or_else(|| StandinError::InvalidAttribute {
                target: self.name.clone(),
                attribute: attribute.to_string(),
            })?;
        function(&args)
    }
}

impl Target for Namespace {
    fn identity(&self) -> TargetId {
        TargetId::Namespace {
            name: self.name.clone(),
        }
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        self.table.contains(attribute)
    }

    fn swap_attribute(&self, attribute: &str, replacement: AttributeFn) -> Result<AttributeFn> {
        self.table.swap(&self.identity(), attribute, replacement)
    }
}

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// An object-like target: callable methods on one runtime instance.
///
/// Two `Instance` values of the same type have distinct identities; the
/// runtime id is assigned at construction.
pub struct Instance {
    type_name: String,
    instance_id: u64,
    table: AttributeTable,
}

impl Instance {
    /// Create an instance target with the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst),
            table: AttributeTable::default(),
        }
    }

    /// Builder form of [`Instance::register`].
    #[must_use]
    pub fn with_method<F>(self, attribute: impl Into<String>, function: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.register(attribute, function);
        self
    }

    /// Register a callable method.
    pub fn register<F>(&self, attribute: impl Into<String>, function: F)
    where
        F: Fn(&CallArgs) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.table.insert(attribute.into(), Arc::new(function));
    }

    /// Call a method with the given arguments.
    pub fn invoke(&self, attribute: &str, args: CallArgs) -> Result<Option<Value>> {
        let function = self
            .table
            .fetch(attribute)
            .ok_or_else(|| StandinError::InvalidAttribute {
                target: self.type_name.clone(),
                attribute: attribute.to_string(),
            })?;
        function(&args)
    }
}

impl Target for Instance {
    fn identity(&self) -> TargetId {
        TargetId::Instance {
            type_name: self.type_name.clone(),
            instance_id: self.instance_id,
        }
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        self.table.contains(attribute)
    }

    fn swap_attribute(&self, attribute: &str, replacement: AttributeFn) -> Result<AttributeFn> {
        self.table.swap(&self.identity(), attribute, replacement)
    }
}
