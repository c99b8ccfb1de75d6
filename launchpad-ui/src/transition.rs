//! Transition roles and routing-animation classes.
//!
//! The router only derives a [`Direction`]; the outlet pairs it with a
//! [`TransitionState`] per drawn screen. [`animation_class`] and
//! [`RoutingTransitionConfig`] turn that pair into styling decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of the last navigation, derived from the two stack indices.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// The cursor moved towards the root.
    Backward,
    /// The destination has the same url as the origin.
    Lateral,
    /// The cursor moved away from the root.
    Forward,
}

impl Direction {
    /// `-1`, `0` or `1`.
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Backward => -1,
            Direction::Lateral => 0,
            Direction::Forward => 1,
        }
    }

    /// Class fragment used by routing animations.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Backward => "backward",
            Direction::Lateral => "lateral",
            Direction::Forward => "forward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a drawn screen in the running transition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionState {
    /// Being brought into view.
    In,
    /// Leaving the view.
    Out,
    /// No transition is rendered.
    Idle,
}

impl TransitionState {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionState::In => "in",
            TransitionState::Out => "out",
            TransitionState::Idle => "idle",
        }
    }
}

/// Whether a drawn screen is shown primarily.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenType {
    /// The screen at the stack index.
    Current,
    /// The screen at the previous stack index.
    Previous,
    /// Either side of a navigation between two copies of one screen.
    Lateral,
}

/// Build the class string for an element taking part in a routing animation.
///
/// Elements should only enable CSS transitions once `initialized` is true.
pub fn animation_class(
    direction: Direction,
    transition_state: Option<TransitionState>,
    initialized: bool,
) -> String {
    let mut class = String::new();
    if initialized {
        class.push_str("initialized");
    }
    if let Some(state) = transition_state
        && state != TransitionState::Idle
    {
        class.push(' ');
        class.push_str(state.as_str());
    }
    class.push(' ');
    class.push_str(direction.as_str());
    class
}

/// Per-direction entry lists for a screen's routing animation.
#[derive(Clone, Debug)]
pub struct RoutingTransitionConfig<E> {
    /// Entering while navigating forward.
    pub forward_in: Vec<E>,
    /// Leaving while navigating forward.
    pub forward_out: Vec<E>,
    /// Entering while navigating backward.
    pub backward_in: Vec<E>,
    /// Leaving while navigating backward.
    pub backward_out: Vec<E>,
    /// Entering a lateral copy.
    pub lateral_in: Vec<E>,
    /// Leaving a lateral copy.
    pub lateral_out: Vec<E>,
}

impl<E> Default for RoutingTransitionConfig<E> {
    fn default() -> Self {
        Self {
            forward_in: Vec::new(),
            forward_out: Vec::new(),
            backward_in: Vec::new(),
            backward_out: Vec::new(),
            lateral_in: Vec::new(),
            lateral_out: Vec::new(),
        }
    }
}

impl<E> RoutingTransitionConfig<E> {
    /// Entries to apply for `direction` and `state`.
    ///
    /// Returns `None` for idle screens, which never animate.
    pub fn active_entries(&self, direction: Direction, state: TransitionState) -> Option<&[E]> {
        let entering = match state {
            TransitionState::Idle => return None,
            TransitionState::In => true,
            TransitionState::Out => false,
        };
        let entries = match (direction, entering) {
            (Direction::Backward, true) => &self.backward_in,
            (Direction::Backward, false) => &self.backward_out,
            (Direction::Lateral, true) => &self.lateral_in,
            (Direction::Lateral, false) => &self.lateral_out,
            (Direction::Forward, true) => &self.forward_in,
            (Direction::Forward, false) => &self.forward_out,
        };
        Some(entries)
    }
}
