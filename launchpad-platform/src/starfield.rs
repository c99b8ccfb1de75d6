//! Starfield that only records and logs what it is asked to draw.
//!
//! Headless hosts use it where no canvas exists.

use std::sync::atomic::{AtomicBool, Ordering};

use launchpad_ui::Starfield;
use parking_lot::Mutex;
use tracing::debug;

/// Starfield stand-in for terminals and tests.
#[derive(Debug)]
pub struct LogStarfield {
    opacity: Mutex<f32>,
    attached: AtomicBool,
}

impl Default for LogStarfield {
    fn default() -> Self {
        Self {
            opacity: Mutex::new(1.0),
            attached: AtomicBool::new(false),
        }
    }
}

impl LogStarfield {
    /// Create a detached starfield at full opacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last opacity set.
    pub fn opacity(&self) -> f32 {
        *self.opacity.lock()
    }

    /// Whether the starfield is attached.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

impl Starfield for LogStarfield {
    fn update_opacity(&self, opacity: f32) {
        *self.opacity.lock() = opacity;
        debug!(opacity, "star opacity updated");
    }

    fn attach(&self) {
        self.attached.store(true, Ordering::Release);
        debug!("starfield attached");
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::Release);
        debug!("starfield detached");
    }
}
