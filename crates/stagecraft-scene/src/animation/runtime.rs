//! Animation runtime for advancing root timelines.
//!
//! The `AnimationRuntime` is the frame-driven clock behind every timeline in
//! a scene. It handles:
//! - Creating root timelines (`timeline`) and cancellable waits (`delay`)
//! - Advancing every root timeline once per frame (`update`)
//! - Dropping timelines that finished, were killed or got nested
//!
//! # Usage
//!
//! ```
//! use stagecraft_scene::animation::AnimationRuntime;
//!
//! let runtime = AnimationRuntime::new();
//! let wait = runtime.delay(0.5);
//!
//! runtime.update(0.25);
//! assert!(wait.is_active());
//! runtime.update(0.25);
//! assert!(wait.is_complete());
//! assert!(!runtime.has_active_animations());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::timeline::{Timeline, sanitize_secs};

/// Frame-driven clock for every root timeline of a scene.
///
/// Cloning the runtime yields another handle to the same clock. The runtime
/// is single-threaded: timelines own `Rc` callbacks into the UI they drive.
#[derive(Clone, Default)]
pub struct AnimationRuntime {
    timelines: Rc<RefCell<Vec<Timeline>>>,
}

impl AnimationRuntime {
    /// Create a new runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty root timeline that starts playing on the next update.
    pub fn timeline(&self) -> Timeline {
        let timeline = Timeline::new();
        self.timelines.borrow_mut().push(timeline.clone());
        timeline
    }

    /// Create a root timeline that only waits `secs` seconds.
    pub fn delay(&self, secs: f32) -> Timeline {
        let timeline = self.timeline();
        timeline.append_interval(secs);
        timeline
    }

    /// Advance every root timeline by `dt_secs`.
    ///
    /// Negative or non-finite deltas advance by zero. Timelines created by
    /// callbacks during this update are first advanced on the next one.
    pub fn update(&self, dt_secs: f32) {
        let dt = sanitize_secs(dt_secs);
        let roots: Vec<Timeline> = self.timelines.borrow().clone();

        for timeline in roots {
            // Earlier callbacks in this frame may have killed or nested it.
            if timeline.is_active() && !timeline.is_nested() {
                timeline.advance(dt);
            }
        }

        self.timelines
            .borrow_mut()
            .retain(|timeline| timeline.is_active() && !timeline.is_nested());
    }

    /// Number of root timelines still playing.
    pub fn active_count(&self) -> usize {
        self.timelines
            .borrow()
            .iter()
            .filter(|timeline| timeline.is_active() && !timeline.is_nested())
            .count()
    }

    /// Check if there are any active root timelines.
    pub fn has_active_animations(&self) -> bool {
        self.active_count() > 0
    }

    /// Kill every root timeline without completing it.
    pub fn kill_all(&self) {
        let roots: Vec<Timeline> = self.timelines.borrow_mut().drain(..).collect();
        for timeline in roots {
            timeline.kill(false);
        }
    }
}

impl std::fmt::Debug for AnimationRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRuntime")
            .field("active", &self.active_count())
            .finish()
    }
}

// Timelines hold `Rc` callbacks into the UI; keep the runtime on one thread.
static_assertions::assert_not_impl_any!(AnimationRuntime: Send, Sync);
