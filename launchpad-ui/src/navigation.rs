//! The navigation stack store: four state cells kept in lockstep.
//!
//! The store owns the visited urls, the per-entry props, the current index and
//! the previous index. It is created empty and "not ready" (both indices
//! `None`); the application seeds it with a root entry once assets have
//! loaded. Afterwards only the [`Router`](crate::router::Router) mutates it.

use im::Vector;
use launchpad_shard::StateCell;

use crate::props::ScreenProps;

/// Sequence of visited urls.
pub type ScreenStack = Vector<String>;

/// Props aligned index-for-index with a [`ScreenStack`].
pub type ScreenPropsStack = Vector<Option<ScreenProps>>;

/// Cells backing one navigation history.
#[derive(Clone, Debug)]
pub struct NavigationStore {
    /// Ordered list of visited urls.
    pub screen_stack: StateCell<ScreenStack>,
    /// Props for each stack entry.
    pub screen_props: StateCell<ScreenPropsStack>,
    /// Cursor into the stack; `None` until the store is seeded.
    pub stack_index: StateCell<Option<usize>>,
    /// Cursor value before the last navigation.
    pub previous_stack_index: StateCell<Option<usize>>,
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStore {
    /// Create an empty, not-ready store.
    pub fn new() -> Self {
        Self {
            screen_stack: StateCell::new(Vector::new()),
            screen_props: StateCell::new(Vector::new()),
            stack_index: StateCell::new(None),
            previous_stack_index: StateCell::new(None),
        }
    }

    /// Reset the history to a single root entry with no props.
    pub fn seed(&self, root_url: impl Into<String>) {
        self.screen_stack.set(Vector::unit(root_url.into()));
        self.screen_props.set(Vector::unit(None));
        self.stack_index.set(Some(0));
    }

    /// Whether the store has been seeded.
    pub fn is_ready(&self) -> bool {
        self.stack_index.get().is_some()
    }

    /// Sum of all cell versions, which changes on every committed write.
    pub fn revision(&self) -> u64 {
        self.screen_stack.version()
            + self.screen_props.version()
            + self.stack_index.version()
            + self.previous_stack_index.version()
    }
}
