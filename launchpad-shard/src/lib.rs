//! Observable state cells shared between the launchpad router and its host.
//!
//! A [`StateCell`] is a cheap, clonable handle to one value. Every write bumps
//! a monotonic version and notifies the cell's observers, so consumers can
//! detect change without comparing values.
//!
//! Sequence-valued cells are mutated through the copy-on-write helpers in
//! [`array`], which always hand the setter a fresh [`im::Vector`].
#![deny(missing_docs, clippy::unwrap_used)]

pub mod array;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::DashMap;
use parking_lot::RwLock;

pub use array::{pop_state, push_state, replace_state, splice_state};

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier for one registered observer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ObserverId(u64);

impl ObserverId {
    fn new() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct CellInner<T> {
    value: RwLock<T>,
    version: AtomicU64,
    observers: DashMap<ObserverId, Observer<T>>,
}

/// Handle to one observable value.
///
/// Clones share the same storage. Use [`StateCell::ptr_eq`] to check whether
/// two handles point at the same cell.
pub struct StateCell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.inner.value.read())
            .field("version", &self.version())
            .finish()
    }
}

impl<T> StateCell<T> {
    /// Create a cell holding `value` at version 0.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
                observers: DashMap::new(),
            }),
        }
    }

    /// Number of writes applied to this cell so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute a closure with a shared reference to the value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.value.read();
        f(&guard)
    }

    /// Get a cloned value. Requires `T: Clone`.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(Clone::clone)
    }

    /// Register an observer that runs after every write.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId::new();
        self.inner.observers.insert(id, Arc::new(observer));
        id
    }

    /// Remove a previously registered observer.
    ///
    /// Returns `false` if the id was unknown.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.inner.observers.remove(&id).is_some()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Replace the stored value and notify observers.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.commit();
    }

    /// Mutate the stored value in place and notify observers.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = {
            let mut guard = self.inner.value.write();
            f(&mut guard)
        };
        self.commit();
        result
    }

    fn commit(&self) {
        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
        if self.inner.observers.is_empty() {
            return;
        }
        // Observers run on a snapshot with no lock held, so they may write back.
        let snapshot = self.get();
        let observers: Vec<_> = self
            .inner
            .observers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tracing::trace!(version, observers = observers.len(), "notifying state observers");
        for observer in observers {
            observer(&snapshot);
        }
    }
}
