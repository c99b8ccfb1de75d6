//! Stack-based screen routing.
//!
//! The [`Router`] keeps its own in-memory history instead of using a platform
//! history API. History lives in a [`NavigationStore`] bound through
//! [`Router::assign_state`].
//!
//! # Responsibilities
//!
//! - Move the cursor forward (appending, or truncating a redo branch) and
//!   backward (one step, or to the latest entry with a given url).
//! - Keep the props sequence aligned with the url sequence, rewriting the props
//!   of the screen being left when asked to.
//! - Dispatch background side effects for the destination once the store has
//!   been fully updated.
//!
//! Invalid navigation requests (an unknown backward target, a forward request
//! without a url) are ignored rather than reported; they originate from
//! content-authored data and must not take the application down.

use std::sync::Arc;

use launchpad_shard::{StateCell, push_state, replace_state, splice_state};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::{
    background::{BackgroundHooks, background_for},
    config::ScreenConfig,
    navigation::{NavigationStore, ScreenPropsStack, ScreenStack},
    props::ScreenProps,
    screen::{Screen, ScreenRegistry},
    transition::Direction,
};

/// Precondition violations raised by the router.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// State was read before [`Router::assign_state`] was called.
    #[error("router {0} was accessed before the router was initialized")]
    Uninitialized(&'static str),
    /// A stack index beyond the end of the stack was requested.
    #[error("requested screen index {index} exceeds screen stack bounds (length {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Stack length at the time of the request.
        len: usize,
    },
}

/// Which way a [`Router::set_screen`] request travels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Travel {
    /// Towards the root of the stack.
    Backward,
    /// Away from the root of the stack.
    #[default]
    Forward,
}

/// Options for [`Router::set_screen`].
#[derive(Clone, Debug, Default)]
pub struct SetScreenOptions {
    /// Destination url. Required when travelling forward.
    pub url: Option<String>,
    /// Props for the destination when travelling forward.
    pub props: Option<ScreenProps>,
    /// Direction of travel, forward by default.
    pub travel: Travel,
    /// New props for the screen being left.
    pub previous_props: Option<ScreenProps>,
}

impl SetScreenOptions {
    /// Navigate forward to `url`.
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Navigate back by one entry.
    pub fn back() -> Self {
        Self {
            travel: Travel::Backward,
            ..Self::default()
        }
    }

    /// Navigate back to the latest entry with `url`.
    pub fn back_to(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            travel: Travel::Backward,
            ..Self::default()
        }
    }

    /// Set the destination props.
    pub fn props(mut self, props: ScreenProps) -> Self {
        self.props = Some(props);
        self
    }

    /// Rewrite the props of the screen being left.
    pub fn previous_props(mut self, props: ScreenProps) -> Self {
        self.previous_props = Some(props);
        self
    }
}

/// Manages the screen history of the application.
pub struct Router {
    screens: Arc<[ScreenConfig]>,
    registry: ScreenRegistry,
    hooks: Arc<dyn BackgroundHooks>,
    state: RwLock<Option<NavigationStore>>,
}

impl Router {
    /// Create an unbound router.
    ///
    /// `screens` resolves stack urls to screen ids, `registry` resolves ids to
    /// screens, and `hooks` receives background side effects.
    pub fn new(
        screens: impl Into<Arc<[ScreenConfig]>>,
        registry: ScreenRegistry,
        hooks: Arc<dyn BackgroundHooks>,
    ) -> Self {
        Self {
            screens: screens.into(),
            registry,
            hooks,
            state: RwLock::new(None),
        }
    }

    /// Bind the router to the cells holding the navigation history.
    ///
    /// Rebinding replaces the previous cells; the latest binding always wins.
    pub fn assign_state(
        &self,
        screen_stack: StateCell<ScreenStack>,
        screen_props: StateCell<ScreenPropsStack>,
        stack_index: StateCell<Option<usize>>,
        previous_stack_index: StateCell<Option<usize>>,
    ) {
        *self.state.write() = Some(NavigationStore {
            screen_stack,
            screen_props,
            stack_index,
            previous_stack_index,
        });
    }

    /// Whether [`Router::assign_state`] has been called.
    pub fn is_bound(&self) -> bool {
        self.state.read().is_some()
    }

    fn store(&self) -> Option<NavigationStore> {
        self.state.read().clone()
    }

    fn bound(&self, field: &'static str) -> Result<NavigationStore, RouterError> {
        self.store().ok_or(RouterError::Uninitialized(field))
    }

    /// The entire stack of screen urls.
    pub fn screen_stack(&self) -> Result<ScreenStack, RouterError> {
        Ok(self.bound("screenStack")?.screen_stack.get())
    }

    /// The entire stack of screen props.
    pub fn screen_props(&self) -> Result<ScreenPropsStack, RouterError> {
        Ok(self.bound("screenProps")?.screen_props.get())
    }

    /// Current position in the stack; `None` while unbound or not ready.
    pub fn stack_index(&self) -> Option<usize> {
        self.store().and_then(|store| store.stack_index.get())
    }

    /// Position before the last navigation; `None` while unbound or unset.
    pub fn previous_stack_index(&self) -> Option<usize> {
        self.store()
            .and_then(|store| store.previous_stack_index.get())
    }

    /// Direction of the last navigation.
    ///
    /// Lateral when both indices hold the same url, and also whenever either
    /// index does not point into the stack.
    pub fn direction(&self) -> Direction {
        let Some(store) = self.store() else {
            return Direction::Lateral;
        };
        let (Some(index), Some(previous)) =
            (store.stack_index.get(), store.previous_stack_index.get())
        else {
            return Direction::Lateral;
        };
        store.screen_stack.with(|stack| {
            match (stack.get(index), stack.get(previous)) {
                (Some(current), Some(before)) if current == before => Direction::Lateral,
                (Some(_), Some(_)) if index < previous => Direction::Backward,
                (Some(_), Some(_)) => Direction::Forward,
                _ => Direction::Lateral,
            }
        })
    }

    /// Url of the current stack entry.
    pub fn screen_url(&self) -> Result<Option<String>, RouterError> {
        let store = self.bound("screenStack")?;
        let Some(index) = store.stack_index.get() else {
            return Ok(None);
        };
        Ok(store.screen_stack.with(|stack| stack.get(index).cloned()))
    }

    /// Url of the entry at the previous stack index.
    pub fn previous_screen_url(&self) -> Result<Option<String>, RouterError> {
        let store = self.bound("screenStack")?;
        let Some(previous) = store.previous_stack_index.get() else {
            return Ok(None);
        };
        Ok(store.screen_stack.with(|stack| stack.get(previous).cloned()))
    }

    /// Resolve a stack entry to its configured screen id.
    ///
    /// `stack_index` defaults to the current index. Returns `Ok(None)` while
    /// the router is unbound or not ready, or when no configured screen has the
    /// entry's url.
    pub fn screen_id(&self, stack_index: Option<usize>) -> Result<Option<String>, RouterError> {
        let Some(store) = self.store() else {
            return Ok(None);
        };
        let Some(current) = store.stack_index.get() else {
            return Ok(None);
        };
        let index = stack_index.unwrap_or(current);
        store.screen_stack.with(|stack| {
            let url = stack.get(index).ok_or(RouterError::IndexOutOfRange {
                index,
                len: stack.len(),
            })?;
            Ok(self
                .screens
                .iter()
                .find(|screen| &screen.url == url)
                .map(|screen| screen.id.clone()))
        })
    }

    /// Resolve a stack entry to the screen registered for it.
    pub fn screen(&self, stack_index: Option<usize>) -> Result<Option<Arc<dyn Screen>>, RouterError> {
        Ok(self
            .screen_id(stack_index)?
            .and_then(|id| self.registry.get(&id)))
    }

    /// Props of a stack entry; `stack_index` defaults to the current index.
    pub fn screen_props_at(&self, stack_index: Option<usize>) -> Option<ScreenProps> {
        let store = self.store()?;
        let index = stack_index.or(store.stack_index.get())?;
        store
            .screen_props
            .with(|props| props.get(index).cloned().flatten())
    }

    /// Navigate back one entry, or to the latest entry with `url`.
    pub fn go_back(&self, url: Option<&str>) {
        let options = match url {
            Some(url) => SetScreenOptions::back_to(url),
            None => SetScreenOptions::back(),
        };
        self.set_screen(options);
    }

    /// Navigate to a screen.
    ///
    /// The previous index is always recorded first, even when the request
    /// turns out to be invalid and is ignored.
    #[tracing::instrument(
        level = "debug",
        skip(self, options),
        fields(url = options.url.as_deref(), travel = ?options.travel)
    )]
    pub fn set_screen(&self, options: SetScreenOptions) {
        let SetScreenOptions {
            url,
            props,
            travel,
            previous_props,
        } = options;
        let Some(store) = self.store() else {
            debug!("ignoring navigation on an unbound router");
            return;
        };

        let stack_index = store.stack_index.get();
        store.previous_stack_index.set(stack_index);

        let current_url = match travel {
            Travel::Backward => step_backward(&store, stack_index, url, previous_props),
            Travel::Forward => {
                step_forward(&store, stack_index, url, props.clone(), previous_props)
            }
        };
        let Some(current_url) = current_url else {
            return;
        };

        if let Some(change) = background_for(&current_url, props.as_ref()) {
            change.apply(self.hooks.as_ref());
        }
    }

    /// Shallow-merge `props` into the latest entry with `url`, searching back
    /// from the current index inclusive.
    ///
    /// Does nothing if no such entry exists. The indices are not touched.
    pub fn overwrite_screen_props(&self, url: &str, props: ScreenProps) {
        let Some(store) = self.store() else {
            return;
        };
        let Some(current) = store.stack_index.get() else {
            return;
        };
        let target = store.screen_stack.with(|stack| {
            let upper = current.min(stack.len().checked_sub(1)?);
            (0..=upper).rev().find(|&i| stack[i] == url)
        });
        let Some(target) = target else {
            debug!(url, "no stack entry to overwrite props for");
            return;
        };
        let merged = store.screen_props.with(|all| {
            let existing = all.get(target).and_then(Option::as_ref);
            ScreenProps::merged(existing, props)
        });
        replace_state(&store.screen_props, target, Some(merged));
    }
}

fn step_backward(
    store: &NavigationStore,
    stack_index: Option<usize>,
    url: Option<String>,
    previous_props: Option<ScreenProps>,
) -> Option<String> {
    let Some(current) = stack_index else {
        debug!("ignoring backward navigation before the stack is ready");
        return None;
    };
    let stack = store.screen_stack.get();
    let (target, current_url) = match url {
        None => {
            let Some(target) = current.checked_sub(1) else {
                debug!("ignoring backward navigation from the root entry");
                return None;
            };
            (target, stack.get(target)?.clone())
        }
        Some(url) => {
            let Some(target) = (0..stack.len()).rev().find(|&i| stack[i] == url) else {
                debug!(url, "ignoring backward navigation to a url missing from the stack");
                return None;
            };
            (target, url)
        }
    };
    store.stack_index.set(Some(target));

    if let Some(previous_props) = previous_props {
        replace_state(&store.screen_props, current, Some(previous_props));
    }
    Some(current_url)
}

fn step_forward(
    store: &NavigationStore,
    stack_index: Option<usize>,
    url: Option<String>,
    props: Option<ScreenProps>,
    previous_props: Option<ScreenProps>,
) -> Option<String> {
    let Some(url) = url else {
        debug!("ignoring forward navigation without a url");
        return None;
    };
    let len = store.screen_stack.with(|stack| stack.len());
    let next_index = stack_index.map_or(0, |index| index + 1);
    // Entries ahead of the cursor, left over from earlier backward navigation.
    let tail_gap = len.saturating_sub(next_index);

    if tail_gap > 0 {
        splice_state(&store.screen_stack, next_index, tail_gap, [url.clone()]);
        match (stack_index, previous_props) {
            (Some(index), Some(previous_props)) => {
                splice_state(
                    &store.screen_props,
                    index,
                    tail_gap + 1,
                    [Some(previous_props), props],
                );
            }
            _ => {
                splice_state(&store.screen_props, next_index, tail_gap, [props]);
            }
        }
    } else {
        push_state(&store.screen_stack, url.clone());
        match (stack_index, previous_props) {
            (Some(index), Some(previous_props)) => {
                splice_state(&store.screen_props, index, 1, [Some(previous_props), props]);
            }
            _ => {
                push_state(&store.screen_props, props);
            }
        }
    }
    store.stack_index.set(Some(next_index));
    Some(url)
}
