//! The `Animatable` capability.
//!
//! An animatable drives some UI resource between two authored boundary
//! states. It owns at most one timeline at a time: starting a new animation,
//! snapping to a boundary or dropping the animatable terminates the previous
//! one first, so two timelines never write the same resource.
//!
//! Implementors only describe *what* changes: how to write a boundary state
//! ([`Animatable::apply_boundary`]) and which tweens make up a play
//! ([`Animatable::populate`]). Ownership of the timeline and the
//! kill-before-write ordering live in the provided methods.

use std::cell::RefCell;
use std::rc::Rc;

use super::runtime::AnimationRuntime;
use super::timeline::Timeline;

/// One of the two authored states of an animatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    /// The boundary a play in the given direction heads towards.
    pub fn target(reverse: bool) -> Self {
        if reverse { Self::Start } else { Self::End }
    }

    /// Pick the value belonging to this boundary.
    pub fn pick<T>(self, start: T, end: T) -> T {
        match self {
            Self::Start => start,
            Self::End => end,
        }
    }
}

/// Exclusive owner of an animatable's current timeline.
#[derive(Debug)]
pub struct TimelineSlot {
    runtime: AnimationRuntime,
    current: Option<Timeline>,
}

impl TimelineSlot {
    pub fn new(runtime: AnimationRuntime) -> Self {
        Self {
            runtime,
            current: None,
        }
    }

    /// Kill the owned timeline and start owning a fresh, empty one.
    pub fn begin(&mut self) -> Timeline {
        self.kill();
        let timeline = self.runtime.timeline();
        self.current = Some(timeline.clone());
        timeline
    }

    /// Kill the owned timeline, if any, leaving properties where they are.
    pub fn kill(&mut self) {
        if let Some(timeline) = self.current.take() {
            timeline.kill(false);
        }
    }

    /// The owned timeline while it is still playing.
    pub fn current(&self) -> Option<&Timeline> {
        self.current.as_ref().filter(|timeline| timeline.is_active())
    }

    pub fn is_animating(&self) -> bool {
        self.current().is_some()
    }

    pub fn runtime(&self) -> &AnimationRuntime {
        &self.runtime
    }
}

impl Drop for TimelineSlot {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Capability of a UI element that can be driven between two boundary states.
pub trait Animatable {
    fn slot(&self) -> &TimelineSlot;

    fn slot_mut(&mut self) -> &mut TimelineSlot;

    /// Write the boundary state directly to the driven resource.
    fn apply_boundary(&mut self, boundary: Boundary);

    /// Add this element's tweens to a freshly started timeline.
    ///
    /// Segments are expected to be joined, so the timeline lasts as long as
    /// its longest segment.
    fn populate(&mut self, timeline: &Timeline, reverse: bool);

    /// Kill any running animation, then snap to the start state.
    fn set_to_start(&mut self) {
        self.kill_sequence();
        self.apply_boundary(Boundary::Start);
    }

    /// Kill any running animation, then snap to the end state.
    fn set_to_end(&mut self) {
        self.kill_sequence();
        self.apply_boundary(Boundary::End);
    }

    /// Start animating towards the end state, or the start state when
    /// `reverse` is set. The returned timeline is already playing.
    fn animate(&mut self, reverse: bool) -> Timeline {
        let timeline = self.slot_mut().begin();
        self.populate(&timeline, reverse);
        timeline
    }

    /// Kill the running animation. Does nothing when idle.
    fn kill_sequence(&mut self) {
        self.slot_mut().kill();
    }

    fn is_animating(&self) -> bool {
        self.slot().is_animating()
    }
}

/// Animatable shared between its owner and the sequences scheduling it.
pub type SharedAnimatable = Rc<RefCell<dyn Animatable>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::timeline::Tween;
    use std::cell::Cell;

    /// Drives a single float between 0 and 1.
    struct Meter {
        slot: TimelineSlot,
        value: Rc<Cell<f32>>,
        duration: f32,
    }

    impl Meter {
        fn new(runtime: &AnimationRuntime) -> Self {
            Self {
                slot: TimelineSlot::new(runtime.clone()),
                value: Rc::new(Cell::new(0.5)),
                duration: 1.0,
            }
        }
    }

    impl Animatable for Meter {
        fn slot(&self) -> &TimelineSlot {
            &self.slot
        }

        fn slot_mut(&mut self) -> &mut TimelineSlot {
            &mut self.slot
        }

        fn apply_boundary(&mut self, boundary: Boundary) {
            self.value.set(boundary.pick(0.0, 1.0));
        }

        fn populate(&mut self, timeline: &Timeline, reverse: bool) {
            let read = self.value.clone();
            let write = self.value.clone();
            let to = Boundary::target(reverse).pick(0.0_f32, 1.0);
            timeline.join(Tween::new(
                move || Some(read.get().into()),
                move |v| write.set(v.as_f32().unwrap_or_default()),
                to.into(),
                self.duration,
            ));
        }
    }

    #[test]
    fn test_boundary_pick() {
        assert_eq!(Boundary::target(false), Boundary::End);
        assert_eq!(Boundary::target(true), Boundary::Start);
        assert_eq!(Boundary::Start.pick("a", "b"), "a");
        assert_eq!(Boundary::End.pick("a", "b"), "b");
    }

    #[test]
    fn test_animate_replaces_previous_timeline() {
        let runtime = AnimationRuntime::new();
        let mut meter = Meter::new(&runtime);

        let first = meter.animate(false);
        let second = meter.animate(true);

        assert!(!first.is_active());
        assert!(second.is_active());
        assert_eq!(runtime.active_count(), 1);
        assert!(meter.slot().current().unwrap().ptr_eq(&second));
    }

    #[test]
    fn test_set_to_end_stops_running_animation() {
        let runtime = AnimationRuntime::new();
        let mut meter = Meter::new(&runtime);

        let timeline = meter.animate(true);
        runtime.update(0.25);
        meter.set_to_end();
        runtime.update(0.25);

        assert!(!timeline.is_active());
        assert_eq!(meter.value.get(), 1.0);
    }

    #[test]
    fn test_kill_sequence_is_idempotent() {
        let runtime = AnimationRuntime::new();
        let mut meter = Meter::new(&runtime);

        meter.kill_sequence();
        meter.animate(false);
        meter.kill_sequence();
        meter.kill_sequence();

        assert!(!meter.is_animating());
        assert_eq!(runtime.active_count(), 0);
    }

    #[test]
    fn test_completed_timeline_is_released() {
        let runtime = AnimationRuntime::new();
        let mut meter = Meter::new(&runtime);

        meter.animate(false);
        runtime.update(2.0);

        assert!(!meter.is_animating());
        assert_eq!(meter.value.get(), 1.0);
    }

    #[test]
    fn test_drop_kills_timeline() {
        let runtime = AnimationRuntime::new();
        let timeline = {
            let mut meter = Meter::new(&runtime);
            meter.animate(false)
        };
        assert!(!timeline.is_active());
    }
}
