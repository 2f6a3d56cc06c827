//! Operation handles and the declared-tools lookup.
//!
//! Callables have no stable identity in Rust, so each tool is wrapped in an
//! [`Operation`] that carries a process-unique [`OperationId`]. Clones of a
//! handle share the id; two handles created separately never compare equal,
//! even when they wrap equal values.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, Result};

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl OperationId {
    fn next() -> Self {
        Self(NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Shared handle to an invocable operation.
///
/// Equality and hashing use the [`OperationId`] only, so the handle can key
/// maps by reference identity rather than by value.
pub struct Operation<T: ?Sized> {
    id: OperationId,
    inner: Arc<T>,
}

impl<T> Operation<T> {
    /// Wrap a value in a new handle with a fresh id.
    pub fn new(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }
}

impl<T: ?Sized> Operation<T> {
    /// Wrap an existing `Arc` in a new handle with a fresh id.
    ///
    /// This is the constructor for trait objects:
    ///
    /// ```
    /// use std::sync::Arc;
    /// use toolset_core::Operation;
    ///
    /// let op: Operation<dyn Fn() -> u32 + Send + Sync> = Operation::from_arc(Arc::new(|| 7));
    /// assert_eq!((*op)(), 7);
    /// ```
    pub fn from_arc(inner: Arc<T>) -> Self {
        Self {
            id: OperationId::next(),
            inner,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn inner(&self) -> &Arc<T> {
        &self.inner
    }

    /// Whether both handles refer to the same operation.
    pub fn same(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Deref for Operation<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> PartialEq for Operation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> Eq for Operation<T> {}

impl<T: ?Sized> Hash for Operation<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Name-indexed view of every operation the process declared.
///
/// Group loaders consult this to find operations by name without the
/// registry knowing how tools are named.
pub struct DeclaredTools<T: ?Sized> {
    tools: BTreeMap<String, Operation<T>>,
}

impl<T: ?Sized> DeclaredTools<T> {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Declare `operation` under `name`.
    ///
    /// Declaring the same operation again under the same name is a no-op.
    /// A name already taken by a different operation is rejected.
    pub fn declare(&mut self, name: impl Into<String>, operation: &Operation<T>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyName);
        }
        match self.tools.get(&name) {
            Some(existing) if existing.same(operation) => Ok(()),
            Some(_) => Err(Error::NameConflict { name }),
            None => {
                self.tools.insert(name, operation.clone());
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Operation<T>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Declared names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<T: ?Sized> fmt::Debug for DeclaredTools<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tools.iter().map(|(name, op)| (name, op.id())))
            .finish()
    }
}

impl<T: ?Sized> Default for DeclaredTools<T> {
    fn default() -> Self {
        Self::new()
    }
}
