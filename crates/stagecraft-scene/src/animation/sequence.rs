//! Ordered, reversible sequences of animatables.
//!
//! A [`SequenceController`] composes the timelines of several
//! [`Animatable`]s into one outer timeline. Every [`AnimationStep`] carries
//! two delays: forward plays walk the steps in stored order and start each
//! one after its `forward_delay`; reverse plays walk them last to first and
//! use `reverse_delay`, so elements collapse in reverse visual order with
//! their own timing.
//!
//! ```text
//! steps:    [A(fwd 0.1, rev 0.3), B(fwd 0.2, rev 0.1)]
//! forward:  0.1 ─ A.animate(false)    0.2 ─ B.animate(false)
//! reverse:  0.1 ─ B.animate(true)     0.3 ─ A.animate(true)
//! ```
//!
//! The controller reports a transition as in progress from the moment a play
//! starts until its timeline completes or is killed explicitly. Restarting a
//! play kills the previous timeline silently: the flag stays set and no
//! completion is reported for the replaced play.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

use super::animatable::{Animatable, SharedAnimatable};
use super::events::{EventQueue, SequenceEvent};
use super::runtime::AnimationRuntime;
use super::timeline::{Timeline, sanitize_secs};
use super::types::AnimationId;

/// Delay used by [`AnimationStep::empty`] for both directions.
pub const DEFAULT_STEP_DELAY: f32 = 0.2;

type Listener = Box<dyn FnMut(&SequenceEvent)>;

/// One scheduled participant of a sequence.
///
/// The step only refers to its animatable; whoever built the animatable
/// keeps it alive.
#[derive(Clone)]
pub struct AnimationStep {
    animatable: Option<Weak<RefCell<dyn Animatable>>>,
    pub forward_delay: f32,
    pub reverse_delay: f32,
}

impl AnimationStep {
    pub fn new<A: Animatable + 'static>(
        animatable: &Rc<RefCell<A>>,
        forward_delay: f32,
        reverse_delay: f32,
    ) -> Self {
        let animatable: SharedAnimatable = animatable.clone();
        Self::from_shared(&animatable, forward_delay, reverse_delay)
    }

    pub fn from_shared(
        animatable: &SharedAnimatable,
        forward_delay: f32,
        reverse_delay: f32,
    ) -> Self {
        Self {
            animatable: Some(Rc::downgrade(animatable)),
            forward_delay,
            reverse_delay,
        }
    }

    /// A step without an animatable; it is skipped when the sequence plays.
    pub fn empty() -> Self {
        Self {
            animatable: None,
            forward_delay: DEFAULT_STEP_DELAY,
            reverse_delay: DEFAULT_STEP_DELAY,
        }
    }

    /// The animatable, if it was set and is still alive.
    pub fn animatable(&self) -> Option<SharedAnimatable> {
        self.animatable.as_ref().and_then(Weak::upgrade)
    }

    /// Delay for the given direction, clamped to a non-negative value.
    pub fn delay(&self, reverse: bool) -> f32 {
        sanitize_secs(if reverse {
            self.reverse_delay
        } else {
            self.forward_delay
        })
    }
}

impl fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationStep")
            .field("alive", &self.animatable().is_some())
            .field("forward_delay", &self.forward_delay)
            .field("reverse_delay", &self.reverse_delay)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    timeline: AnimationId,
    reverse: bool,
}

/// Why the controller is killing its own timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KillMode {
    /// Not killing; a kill now came from outside.
    #[default]
    None,
    /// Replacing the timeline with a new play.
    Restart,
    /// Stopping the transition.
    Explicit,
}

#[derive(Default)]
struct SequenceShared {
    current: Option<Timeline>,
    transition: Option<Transition>,
    kill_mode: KillMode,
    events: EventQueue,
    pending: VecDeque<SequenceEvent>,
    dispatching: bool,
    listeners: Vec<Listener>,
}

/// Plays a list of [`AnimationStep`]s as one reversible sequence.
pub struct SequenceController {
    runtime: AnimationRuntime,
    steps: Vec<AnimationStep>,
    shared: Rc<RefCell<SequenceShared>>,
}

impl SequenceController {
    /// Create a controller and put every step at its start state.
    pub fn new(runtime: AnimationRuntime, steps: Vec<AnimationStep>) -> Self {
        let mut controller = Self {
            runtime,
            steps,
            shared: Rc::new(RefCell::new(SequenceShared::default())),
        };
        controller.set_to_start();
        controller
    }

    /// Play every step towards its end state, or towards its start state in
    /// reverse order when `reverse` is set.
    ///
    /// A play already in progress is replaced without reporting completion.
    pub fn play_sequence(&mut self, reverse: bool) -> Timeline {
        self.stop(KillMode::Restart);

        let timeline = self.runtime.timeline();
        let id = timeline.id();
        {
            let mut shared = self.shared.borrow_mut();
            shared.current = Some(timeline.clone());
            shared.transition = Some(Transition {
                timeline: id,
                reverse,
            });
        }

        let ordered: Vec<&AnimationStep> = if reverse {
            self.steps.iter().rev().collect()
        } else {
            self.steps.iter().collect()
        };

        for step in ordered {
            let Some(animatable) = step.animatable() else {
                log::debug!("sequence step without animatable skipped");
                continue;
            };
            let Ok(mut animatable) = animatable.try_borrow_mut() else {
                log::warn!("animatable is busy; step skipped");
                continue;
            };
            let inner = animatable.animate(reverse);
            timeline.insert(step.delay(reverse), inner);
        }

        let weak = Rc::downgrade(&self.shared);
        timeline.on_complete(move || {
            if let Some(shared) = weak.upgrade() {
                finish_transition(&shared, id, false);
            }
        });
        let weak = Rc::downgrade(&self.shared);
        timeline.on_kill(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if shared.borrow().kill_mode == KillMode::Restart {
                return;
            }
            finish_transition(&shared, id, true);
        });

        // Listeners see the populated timeline and its final duration.
        log::trace!("sequence {id:?} started (reverse: {reverse})");
        emit(
            &self.shared,
            SequenceEvent::Started {
                timeline: id,
                reverse,
            },
        );

        timeline
    }

    /// Stop the running play where it is. Reports completion once if a
    /// transition was running; calling it while idle does nothing.
    ///
    /// The play is terminated, never completed: its `on_complete` callbacks
    /// do not run and the steps keep their current values.
    pub fn kill(&mut self) {
        self.stop(KillMode::Explicit);
    }

    /// Stop the running play, then snap every step to its start state.
    pub fn set_to_start(&mut self) {
        self.kill();
        self.for_each_animatable(|animatable| animatable.set_to_start());
    }

    /// Stop the running play, then snap every step to its end state.
    pub fn set_to_end(&mut self) {
        self.kill();
        self.for_each_animatable(|animatable| animatable.set_to_end());
    }

    fn for_each_animatable(&self, mut f: impl FnMut(&mut dyn Animatable)) {
        for step in &self.steps {
            let Some(animatable) = step.animatable() else {
                continue;
            };
            match animatable.try_borrow_mut() {
                Ok(mut animatable) => f(&mut *animatable),
                Err(_) => log::warn!("animatable is busy; step skipped"),
            };
        }
    }

    fn stop(&self, mode: KillMode) {
        let (timeline, target, previous) = {
            let mut shared = self.shared.borrow_mut();
            let previous = mem::replace(&mut shared.kill_mode, mode);
            (
                shared.current.take(),
                shared.transition.map(|t| t.timeline),
                previous,
            )
        };

        if let Some(timeline) = timeline {
            timeline.kill(false);
        }
        self.shared.borrow_mut().kill_mode = previous;

        // The timeline may already be gone while the flag is still set.
        if mode == KillMode::Explicit {
            if let Some(id) = target {
                finish_transition(&self.shared, id, true);
            }
        }
    }

    /// Check if a play is in progress.
    pub fn is_transitioning(&self) -> bool {
        self.shared.borrow().transition.is_some()
    }

    /// The outer timeline of the play in progress.
    pub fn current_timeline(&self) -> Option<Timeline> {
        self.shared
            .borrow()
            .current
            .clone()
            .filter(Timeline::is_active)
    }

    /// Call `listener` for every event, as it happens.
    pub fn subscribe(&mut self, listener: impl FnMut(&SequenceEvent) + 'static) {
        self.shared.borrow_mut().listeners.push(Box::new(listener));
    }

    /// Take the events recorded since the last drain.
    ///
    /// Only the most recent
    /// [`DEFAULT_EVENT_CAPACITY`](super::events::DEFAULT_EVENT_CAPACITY)
    /// events are kept; listeners see every event.
    pub fn drain_events(&mut self) -> Vec<SequenceEvent> {
        self.shared.borrow_mut().events.drain().collect()
    }

    pub fn pending_event_count(&self) -> usize {
        self.shared.borrow().events.len()
    }

    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    /// Steps can be edited between plays; a running play is not affected.
    pub fn steps_mut(&mut self) -> &mut Vec<AnimationStep> {
        &mut self.steps
    }

    pub fn push_step(&mut self, step: AnimationStep) {
        self.steps.push(step);
    }

    pub fn runtime(&self) -> &AnimationRuntime {
        &self.runtime
    }
}

impl fmt::Debug for SequenceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceController")
            .field("steps", &self.steps)
            .field("transitioning", &self.is_transitioning())
            .finish()
    }
}

impl Drop for SequenceController {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Clear the transition started by timeline `id`, reporting it once.
fn finish_transition(shared: &Rc<RefCell<SequenceShared>>, id: AnimationId, interrupted: bool) {
    let event = {
        let mut state = shared.borrow_mut();
        if state.current.as_ref().is_some_and(|t| t.id() == id) {
            state.current = None;
        }
        match state.transition {
            Some(transition) if transition.timeline == id => {
                state.transition = None;
                SequenceEvent::Completed {
                    timeline: id,
                    reverse: transition.reverse,
                    interrupted,
                }
            }
            _ => return,
        }
    };
    log::trace!("sequence {id:?} completed (interrupted: {interrupted})");
    emit(shared, event);
}

/// Record an event and deliver it to listeners in order, even when a
/// listener triggers further events.
fn emit(shared: &Rc<RefCell<SequenceShared>>, event: SequenceEvent) {
    {
        let mut state = shared.borrow_mut();
        state.events.push(event);
        state.pending.push_back(event);
        if state.dispatching {
            return;
        }
        state.dispatching = true;
    }

    loop {
        let (event, mut listeners) = {
            let mut state = shared.borrow_mut();
            let Some(event) = state.pending.pop_front() else {
                state.dispatching = false;
                return;
            };
            (event, mem::take(&mut state.listeners))
        };

        for listener in listeners.iter_mut() {
            listener(&event);
        }

        let mut state = shared.borrow_mut();
        let added = mem::replace(&mut state.listeners, listeners);
        state.listeners.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::animatable::{Boundary, TimelineSlot};
    use crate::animation::timeline::Tween;
    use crate::animation::types::AnimationState;
    use std::cell::Cell;

    /// Records its value and how often it was snapped to a boundary.
    struct Probe {
        slot: TimelineSlot,
        value: Rc<Cell<f32>>,
        duration: f32,
        log: Rc<RefCell<Vec<(&'static str, Boundary)>>>,
        name: &'static str,
    }

    impl Animatable for Probe {
        fn slot(&self) -> &TimelineSlot {
            &self.slot
        }

        fn slot_mut(&mut self) -> &mut TimelineSlot {
            &mut self.slot
        }

        fn apply_boundary(&mut self, boundary: Boundary) {
            self.log.borrow_mut().push((self.name, boundary));
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

    type Log = Rc<RefCell<Vec<(&'static str, Boundary)>>>;

    fn probe(runtime: &AnimationRuntime, name: &'static str, log: &Log) -> Rc<RefCell<Probe>> {
        Rc::new(RefCell::new(Probe {
            slot: TimelineSlot::new(runtime.clone()),
            value: Rc::new(Cell::new(0.5)),
            duration: 0.3,
            log: log.clone(),
            name,
        }))
    }

    fn current_id(probe: &Rc<RefCell<Probe>>) -> AnimationId {
        probe.borrow().slot().current().unwrap().id()
    }

    struct Fixture {
        runtime: AnimationRuntime,
        a: Rc<RefCell<Probe>>,
        b: Rc<RefCell<Probe>>,
        log: Log,
        controller: SequenceController,
    }

    fn fixture() -> Fixture {
        let runtime = AnimationRuntime::new();
        let log = Log::default();
        let a = probe(&runtime, "a", &log);
        let b = probe(&runtime, "b", &log);
        let controller = SequenceController::new(
            runtime.clone(),
            vec![AnimationStep::new(&a, 0.1, 0.3), AnimationStep::new(&b, 0.2, 0.1)],
        );
        Fixture {
            runtime,
            a,
            b,
            log,
            controller,
        }
    }

    #[test]
    fn test_new_sets_steps_to_start() {
        let f = fixture();
        assert_eq!(f.a.borrow().value.get(), 0.0);
        assert_eq!(f.b.borrow().value.get(), 0.0);
        assert_eq!(
            *f.log.borrow(),
            vec![("a", Boundary::Start), ("b", Boundary::Start)]
        );
        assert!(!f.controller.is_transitioning());
        assert_eq!(f.controller.pending_event_count(), 0);
    }

    #[test]
    fn test_forward_inserts_in_stored_order() {
        let mut f = fixture();
        let timeline = f.controller.play_sequence(false);

        let insertions: Vec<_> = timeline
            .insertions()
            .into_iter()
            .map(|i| (i.offset, i.child))
            .collect();
        assert_eq!(
            insertions,
            vec![(0.1, current_id(&f.a)), (0.2, current_id(&f.b))]
        );
    }

    #[test]
    fn test_reverse_inserts_in_reverse_order_with_reverse_delays() {
        let mut f = fixture();
        f.controller.set_to_end();
        let timeline = f.controller.play_sequence(true);

        let insertions: Vec<_> = timeline
            .insertions()
            .into_iter()
            .map(|i| (i.offset, i.child))
            .collect();
        assert_eq!(
            insertions,
            vec![(0.1, current_id(&f.b)), (0.3, current_id(&f.a))]
        );
    }

    #[test]
    fn test_play_reports_start_and_completion() {
        let mut f = fixture();
        let timeline = f.controller.play_sequence(false);
        assert!(f.controller.is_transitioning());
        assert!(f.controller.current_timeline().unwrap().ptr_eq(&timeline));

        f.runtime.update(0.3);
        assert!(f.controller.is_transitioning());
        f.runtime.update(0.3);

        assert!(!f.controller.is_transitioning());
        assert!(f.controller.current_timeline().is_none());
        assert_eq!(f.a.borrow().value.get(), 1.0);
        assert_eq!(f.b.borrow().value.get(), 1.0);
        assert_eq!(
            f.controller.drain_events(),
            vec![
                SequenceEvent::Started {
                    timeline: timeline.id(),
                    reverse: false
                },
                SequenceEvent::Completed {
                    timeline: timeline.id(),
                    reverse: false,
                    interrupted: false
                },
            ]
        );
    }

    #[test]
    fn test_restart_is_silent() {
        let mut f = fixture();
        let first = f.controller.play_sequence(false);
        f.runtime.update(0.2);
        let second = f.controller.play_sequence(true);

        assert!(!first.is_active());
        assert!(f.controller.is_transitioning());
        assert_eq!(f.runtime.active_count(), 1);

        f.runtime.update(1.0);
        let events = f.controller.drain_events();
        assert_eq!(events.len(), 3);
        assert!(events[0].is_started() && events[1].is_started());
        assert_eq!(
            events[2],
            SequenceEvent::Completed {
                timeline: second.id(),
                reverse: true,
                interrupted: false
            }
        );
        assert!(!f.controller.is_transitioning());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut f = fixture();
        f.controller.play_sequence(false);
        f.runtime.update(0.2);
        f.controller.kill();
        f.controller.kill();
        f.runtime.update(1.0);

        assert!(!f.controller.is_transitioning());
        let completed: Vec<_> = f
            .controller
            .drain_events()
            .into_iter()
            .filter(SequenceEvent::is_completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(matches!(
            completed[0],
            SequenceEvent::Completed {
                interrupted: true,
                ..
            }
        ));
        assert!(f.a.borrow().value.get() < 1.0);
    }

    #[test]
    fn test_kill_when_idle_is_noop() {
        let mut f = fixture();
        f.controller.kill();
        f.controller.set_to_start();
        assert_eq!(f.controller.pending_event_count(), 0);
    }

    #[test]
    fn test_set_to_start_terminates_without_completing() {
        let mut f = fixture();
        let outer = f.controller.play_sequence(false);
        f.runtime.update(0.25);
        let inner = f.a.borrow().slot().current().cloned().unwrap();

        let completed = Rc::new(Cell::new(0));
        for timeline in [&outer, &inner] {
            let completed = completed.clone();
            timeline.on_complete(move || completed.set(completed.get() + 1));
        }
        let value = f.a.borrow().value.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        f.controller.subscribe(move |event| {
            if event.is_completed() {
                sink.borrow_mut().push(value.get());
            }
        });
        let before = f.a.borrow().value.get();
        assert!(before > 0.0 && before < 1.0);

        f.controller.set_to_start();

        assert_eq!(completed.get(), 0);
        assert_eq!(outer.state(), AnimationState::Cancelled);
        assert_eq!(inner.state(), AnimationState::Cancelled);
        // Completion is reported before the snap, with the value frozen.
        assert_eq!(*seen.borrow(), vec![before]);
        assert_eq!(f.a.borrow().value.get(), 0.0);
        assert!(!f.controller.is_transitioning());
        assert!(matches!(
            f.controller.drain_events().last(),
            Some(SequenceEvent::Completed {
                interrupted: true,
                ..
            })
        ));
    }

    /// Records whether its controller was transitioning while it populated.
    struct Witness {
        slot: TimelineSlot,
        controller: Weak<RefCell<SequenceShared>>,
        seen: Rc<Cell<Option<bool>>>,
    }

    impl Animatable for Witness {
        fn slot(&self) -> &TimelineSlot {
            &self.slot
        }

        fn slot_mut(&mut self) -> &mut TimelineSlot {
            &mut self.slot
        }

        fn apply_boundary(&mut self, _boundary: Boundary) {}

        fn populate(&mut self, timeline: &Timeline, _reverse: bool) {
            let transitioning = self
                .controller
                .upgrade()
                .map(|shared| shared.borrow().transition.is_some());
            self.seen.set(transitioning);
            timeline.append_interval(0.1);
        }
    }

    #[test]
    fn test_flag_is_set_while_steps_populate() {
        let runtime = AnimationRuntime::new();
        let seen = Rc::new(Cell::new(None));
        let witness = Rc::new(RefCell::new(Witness {
            slot: TimelineSlot::new(runtime.clone()),
            controller: Weak::new(),
            seen: seen.clone(),
        }));
        let mut controller =
            SequenceController::new(runtime.clone(), vec![AnimationStep::new(&witness, 0.0, 0.0)]);
        witness.borrow_mut().controller = Rc::downgrade(&controller.shared);

        let timeline = controller.play_sequence(false);
        assert_eq!(seen.get(), Some(true));
        assert_eq!(
            controller.drain_events(),
            vec![SequenceEvent::Started {
                timeline: timeline.id(),
                reverse: false,
            }]
        );
    }

    #[test]
    fn test_set_to_end_stops_and_snaps_in_order() {
        let mut f = fixture();
        f.controller.play_sequence(false);
        f.runtime.update(0.15);
        f.log.borrow_mut().clear();

        f.controller.set_to_end();
        f.runtime.update(0.05);

        assert!(!f.controller.is_transitioning());
        assert!(!f.a.borrow().is_animating());
        assert_eq!(
            *f.log.borrow(),
            vec![("a", Boundary::End), ("b", Boundary::End)]
        );
    }

    #[test]
    fn test_external_kill_clears_flag() {
        let mut f = fixture();
        f.controller.play_sequence(false);
        f.runtime.kill_all();

        assert!(!f.controller.is_transitioning());
        assert!(f.controller.drain_events()[1].is_completed());
    }

    #[test]
    fn test_dropped_animatable_is_skipped() {
        let mut f = fixture();
        // Replacing the only strong handle drops the first probe.
        f.b = probe(&f.runtime, "b2", &f.log);
        assert!(f.controller.steps()[1].animatable().is_none());

        let timeline = f.controller.play_sequence(false);
        assert_eq!(timeline.insertions().len(), 1);
        f.controller.push_step(AnimationStep::empty());
        assert_eq!(f.controller.play_sequence(true).insertions().len(), 1);
    }

    #[test]
    fn test_drop_kills_running_play() {
        let f = fixture();
        let Fixture {
            runtime,
            a,
            mut controller,
            ..
        } = f;
        let timeline = controller.play_sequence(false);
        drop(controller);

        assert!(!timeline.is_active());
        assert!(!a.borrow().is_animating());
        assert_eq!(runtime.active_count(), 0);
    }

    #[test]
    fn test_listener_can_restart_sequence() {
        let mut f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        f.controller.subscribe(move |event| s.borrow_mut().push(*event));

        f.controller.play_sequence(false);
        f.runtime.update(1.0);
        assert_eq!(seen.borrow().len(), 2);

        // A completion listener replaying the sequence sees its own start.
        let controller = Rc::new(RefCell::new(f.controller));
        let weak = Rc::downgrade(&controller);
        controller.borrow_mut().subscribe(move |event| {
            if let SequenceEvent::Completed { reverse: false, .. } = event {
                if let Some(controller) = weak.upgrade() {
                    if let Ok(mut controller) = controller.try_borrow_mut() {
                        controller.play_sequence(true);
                    }
                }
            }
        });
        controller.borrow_mut().play_sequence(false);
        f.runtime.update(1.0);

        assert!(controller.borrow().is_transitioning());
        let tail: Vec<_> = seen.borrow()[2..].to_vec();
        assert_eq!(tail.len(), 3);
        assert!(tail[0].is_started() && !tail[0].is_reverse());
        assert!(tail[1].is_completed());
        assert!(tail[2].is_started() && tail[2].is_reverse());
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        PlayForward,
        PlayReverse,
        Kill,
        SetToStart,
        ShortTick,
        LongTick,
    }

    const OPS: [Op; 6] = [
        Op::PlayForward,
        Op::PlayReverse,
        Op::Kill,
        Op::SetToStart,
        Op::ShortTick,
        Op::LongTick,
    ];

    fn check_events(events: &[SequenceEvent], trace: &[Op]) {
        let mut open: Option<AnimationId> = None;
        for event in events {
            match event {
                SequenceEvent::Started { timeline, .. } => open = Some(*timeline),
                SequenceEvent::Completed { timeline, .. } => {
                    assert_eq!(open, Some(*timeline), "unmatched completion after {trace:?}");
                    open = None;
                }
            }
        }
    }

    #[test]
    fn test_flag_consistency_over_all_short_call_sequences() {
        const LEN: u32 = 5;

        for n in 0..OPS.len().pow(LEN) {
            let mut f = fixture();
            let mut trace = Vec::new();
            let mut code = n;

            for _ in 0..LEN {
                let op = OPS[code % OPS.len()];
                code /= OPS.len();
                trace.push(op);

                match op {
                    Op::PlayForward => {
                        f.controller.play_sequence(false);
                    }
                    Op::PlayReverse => {
                        f.controller.play_sequence(true);
                    }
                    Op::Kill => f.controller.kill(),
                    Op::SetToStart => f.controller.set_to_start(),
                    Op::ShortTick => f.runtime.update(0.05),
                    Op::LongTick => f.runtime.update(1.0),
                }

                assert_eq!(
                    f.controller.is_transitioning(),
                    f.controller.current_timeline().is_some(),
                    "flag out of sync after {trace:?}"
                );
                assert!(f.runtime.active_count() <= 1, "two plays after {trace:?}");
            }

            f.controller.kill();
            assert!(!f.controller.is_transitioning(), "flag stuck after {trace:?}");
            assert_eq!(f.runtime.active_count(), 0);

            let events = f.controller.drain_events();
            check_events(&events, &trace);
            if let Some(last) = events.last() {
                assert!(last.is_completed(), "no completion after {trace:?}");
            }
        }
    }
}
