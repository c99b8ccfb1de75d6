//! Static mapping from screen id to the content that renders it.

use std::{fmt, sync::Arc};

use rustc_hash::FxHashMap;

use crate::props::ScreenProps;

/// A renderable screen.
///
/// Rendering itself belongs to the host; the router only hands out the
/// screen registered for a stack entry.
pub trait Screen: Send + Sync {
    /// Produce the screen's content for the given props.
    fn render(&self, props: Option<&ScreenProps>) -> String;
}

impl<F> Screen for F
where
    F: Fn(Option<&ScreenProps>) -> String + Send + Sync,
{
    fn render(&self, props: Option<&ScreenProps>) -> String {
        self(props)
    }
}

/// Read-only lookup from screen id to [`Screen`].
#[derive(Clone, Default)]
pub struct ScreenRegistry {
    screens: FxHashMap<String, Arc<dyn Screen>>,
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.screens.keys().collect();
        ids.sort();
        f.debug_struct("ScreenRegistry").field("ids", &ids).finish()
    }
}

impl ScreenRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `screen` under `id`, replacing any previous entry.
    pub fn with(mut self, id: impl Into<String>, screen: impl Screen + 'static) -> Self {
        self.insert(id, screen);
        self
    }

    /// Register `screen` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, screen: impl Screen + 'static) {
        self.screens.insert(id.into(), Arc::new(screen));
    }

    /// Screen registered under `id`.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Screen>> {
        self.screens.get(id).cloned()
    }

    /// Number of registered screens.
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Whether no screen is registered.
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
