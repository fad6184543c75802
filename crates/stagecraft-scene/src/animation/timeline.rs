//! Composable timelines of property tweens.
//!
//! A [`Timeline`] is a cheap, cloneable handle to a time-ordered set of
//! segments: single-property [`Tween`]s, empty intervals and nested
//! timelines. Root timelines are created by, and advanced through, an
//! [`AnimationRuntime`](super::runtime::AnimationRuntime); once a timeline is
//! inserted into another one it stops playing on its own and is driven by its
//! parent.
//!
//! ```text
//! Timeline (outer)
//!   ├── insert(0.1) ── Timeline (step A) ── join ── Tween(alpha)
//!   │                                      └ join ── Tween(scale)
//!   └── insert(0.2) ── Timeline (step B) ── join ── Tween(anchored_position)
//! ```
//!
//! Lifecycle callbacks:
//! - `on_complete` callbacks run once, in registration order, when the
//!   timeline reaches its end (or is killed with `complete_instantly`).
//! - `on_kill` runs once when the timeline is killed. Natural completion does
//!   not fire it.
//! - `on_update` receives the normalized progress after every advance.
//!
//! Every callback is detached from the timeline before it runs, so callbacks
//! may freely kill, create or populate timelines.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use super::easing::EasingFunction;
use super::interpolate::Interpolate;
use super::types::{AnimatableValue, AnimationId, AnimationState};

type Getter = Box<dyn Fn() -> Option<AnimatableValue>>;
type Setter = Box<dyn FnMut(AnimatableValue)>;
type Callback = Box<dyn FnOnce()>;
type ProgressCallback = Box<dyn FnMut(f32)>;

/// A single-property interpolation.
///
/// The start value is read through the getter the first time the tween's
/// local time reaches zero, so a tween always departs from wherever the
/// property currently is. A getter returning `None` (the target is gone)
/// turns the tween into a no-op.
pub struct Tween {
    getter: Getter,
    setter: Setter,
    from: Option<AnimatableValue>,
    to: AnimatableValue,
    duration: f32,
    easing: EasingFunction,
    finished: bool,
}

impl Tween {
    /// Create a tween that drives a property towards `to` over `duration` seconds.
    ///
    /// Negative or non-finite durations are treated as zero (instant).
    pub fn new(
        getter: impl Fn() -> Option<AnimatableValue> + 'static,
        setter: impl FnMut(AnimatableValue) + 'static,
        to: AnimatableValue,
        duration: f32,
    ) -> Self {
        Self {
            getter: Box::new(getter),
            setter: Box::new(setter),
            from: None,
            to,
            duration: sanitize_secs(duration),
            easing: EasingFunction::default(),
            finished: false,
        }
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    pub fn target(&self) -> AnimatableValue {
        self.to
    }

    /// Move the tween to `local` seconds after its own start.
    fn seek(&mut self, local: f32) {
        if self.finished || local < 0.0 {
            return;
        }

        let from = match self.from {
            Some(from) => from,
            None => match (self.getter)() {
                Some(current) => {
                    self.from = Some(current);
                    current
                }
                None => {
                    self.finished = true;
                    return;
                }
            },
        };

        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            local / self.duration
        };

        if progress >= 1.0 {
            (self.setter)(self.to);
            self.finished = true;
        } else {
            let eased = self.easing.evaluate(progress);
            (self.setter)(from.interpolate(&self.to, eased));
        }
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Something that can be placed on a timeline.
pub enum TimelineItem {
    Tween(Tween),
    Timeline(Timeline),
}

impl From<Tween> for TimelineItem {
    fn from(tween: Tween) -> Self {
        Self::Tween(tween)
    }
}

impl From<Timeline> for TimelineItem {
    fn from(timeline: Timeline) -> Self {
        Self::Timeline(timeline)
    }
}

impl From<&Timeline> for TimelineItem {
    fn from(timeline: &Timeline) -> Self {
        Self::Timeline(timeline.clone())
    }
}

/// Offset and identity of a nested timeline, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    pub offset: f32,
    pub child: AnimationId,
}

enum Segment {
    Tween(Tween),
    Interval(f32),
    Timeline(Timeline),
}

impl Segment {
    fn duration(&self) -> f32 {
        match self {
            Self::Tween(tween) => tween.duration,
            Self::Interval(secs) => *secs,
            Self::Timeline(child) => child.duration(),
        }
    }
}

struct Entry {
    offset: f32,
    segment: Segment,
}

struct TimelineInner {
    id: AnimationId,
    entries: Vec<Entry>,
    /// Start of the most recently appended segment; `join` inserts here.
    cursor: f32,
    /// Cached end of the last segment. Nested timelines contribute the
    /// duration they had when they were inserted.
    span: f32,
    elapsed: f32,
    state: AnimationState,
    nested: bool,
    seeking: bool,
    on_complete: Vec<Callback>,
    on_kill: Option<Callback>,
    on_update: Option<ProgressCallback>,
}

/// Handle to a composed, playing timeline.
///
/// Clones share the same underlying timeline.
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<RefCell<TimelineInner>>,
}

impl Timeline {
    /// Create an empty, running timeline. Use
    /// [`AnimationRuntime::timeline`](super::runtime::AnimationRuntime::timeline)
    /// to get one that is actually advanced.
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimelineInner {
                id: AnimationId::new(),
                entries: Vec::new(),
                cursor: 0.0,
                span: 0.0,
                elapsed: 0.0,
                state: AnimationState::Running,
                nested: false,
                seeking: false,
                on_complete: Vec::new(),
                on_kill: None,
                on_update: None,
            })),
        }
    }

    pub fn id(&self) -> AnimationId {
        self.inner.borrow().id
    }

    /// Total length in seconds: the end of the latest-ending segment.
    pub fn duration(&self) -> f32 {
        self.inner.borrow().span
    }

    /// Seconds played so far.
    pub fn elapsed(&self) -> f32 {
        self.inner.borrow().elapsed
    }

    pub fn state(&self) -> AnimationState {
        self.inner.borrow().state
    }

    /// Check if the timeline is still playing (or waiting to be reached by its parent).
    pub fn is_active(&self) -> bool {
        self.state() == AnimationState::Running
    }

    /// Check if the timeline reached its end.
    pub fn is_complete(&self) -> bool {
        self.state() == AnimationState::Finished
    }

    pub(crate) fn is_nested(&self) -> bool {
        self.inner.borrow().nested
    }

    /// Check if two handles point at the same timeline.
    pub fn ptr_eq(&self, other: &Timeline) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Nested timelines with their start offsets, in insertion order.
    pub fn insertions(&self) -> Vec<Insertion> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter_map(|entry| match &entry.segment {
                Segment::Timeline(child) => Some(Insertion {
                    offset: entry.offset,
                    child: child.id(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Add an item so it runs concurrently with the most recently appended one.
    pub fn join(&self, item: impl Into<TimelineItem>) -> &Self {
        let cursor = self.inner.borrow().cursor;
        self.push(cursor, item.into());
        self
    }

    /// Add an item after everything already on the timeline.
    pub fn append(&self, item: impl Into<TimelineItem>) -> &Self {
        let offset = {
            let mut inner = self.inner.borrow_mut();
            inner.cursor = inner.span;
            inner.span
        };
        self.push(offset, item.into());
        self
    }

    /// Add an empty interval after everything already on the timeline.
    pub fn append_interval(&self, secs: f32) -> &Self {
        let mut inner = self.inner.borrow_mut();
        let offset = inner.span;
        let secs = sanitize_secs(secs);
        inner.cursor = offset;
        inner.span = offset + secs;
        inner.entries.push(Entry {
            offset,
            segment: Segment::Interval(secs),
        });
        drop(inner);
        self
    }

    /// Add an item starting `offset` seconds into the timeline.
    ///
    /// Negative or non-finite offsets are treated as zero.
    pub fn insert(&self, offset: f32, item: impl Into<TimelineItem>) -> &Self {
        self.push(sanitize_secs(offset), item.into());
        self
    }

    fn push(&self, offset: f32, item: TimelineItem) {
        let segment = match item {
            TimelineItem::Tween(tween) => Segment::Tween(tween),
            TimelineItem::Timeline(child) => {
                if child.ptr_eq(self) {
                    log::warn!("timeline {:?} cannot contain itself", self.id());
                    return;
                }
                child.inner.borrow_mut().nested = true;
                Segment::Timeline(child)
            }
        };

        let end = offset + segment.duration();
        let mut inner = self.inner.borrow_mut();
        inner.span = inner.span.max(end);
        inner.entries.push(Entry { offset, segment });
    }

    /// Register a callback for natural completion.
    pub fn on_complete(&self, callback: impl FnOnce() + 'static) -> &Self {
        self.inner.borrow_mut().on_complete.push(Box::new(callback));
        self
    }

    /// Register the callback for forced termination, replacing any previous one.
    pub fn on_kill(&self, callback: impl FnOnce() + 'static) -> &Self {
        self.inner.borrow_mut().on_kill = Some(Box::new(callback));
        self
    }

    /// Register the progress callback, replacing any previous one.
    pub fn on_update(&self, callback: impl FnMut(f32) + 'static) -> &Self {
        self.inner.borrow_mut().on_update = Some(Box::new(callback));
        self
    }

    /// Terminate the timeline.
    ///
    /// With `complete_instantly` every segment jumps to its end value and the
    /// completion callbacks run before `on_kill`. Otherwise properties stay
    /// where they are and only `on_kill` runs. Nested timelines are
    /// terminated with the parent. Killing a timeline that already finished
    /// or was killed does nothing.
    pub fn kill(&self, complete_instantly: bool) {
        if !self.is_active() {
            return;
        }

        if complete_instantly {
            let on_kill = self.inner.borrow_mut().on_kill.take();
            self.seek(f32::INFINITY);
            // Still running when the kill came from inside our own seek.
            self.finish();
            if let Some(callback) = on_kill {
                callback();
            }
            return;
        }

        let on_kill = {
            let mut inner = self.inner.borrow_mut();
            inner.state = AnimationState::Cancelled;
            inner.on_complete.clear();
            inner.on_update = None;
            inner.on_kill.take()
        };
        self.kill_children();
        if let Some(callback) = on_kill {
            callback();
        }
    }

    fn kill_children(&self) {
        let children: Vec<Timeline> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter_map(|entry| match &entry.segment {
                Segment::Timeline(child) => Some(child.clone()),
                _ => None,
            })
            .collect();
        for child in children {
            child.kill(false);
        }
    }

    /// Advance by `dt` seconds.
    pub(crate) fn advance(&self, dt: f32) {
        let time = self.elapsed() + dt;
        self.seek(time);
    }

    /// Move the playhead to `time` seconds and apply every segment.
    fn seek(&self, time: f32) {
        let (mut entries, span) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != AnimationState::Running || inner.seeking {
                return;
            }
            inner.seeking = true;
            inner.elapsed = time.min(inner.span).max(0.0);
            (mem::take(&mut inner.entries), inner.span)
        };

        let finishing = time >= span;
        for entry in entries.iter_mut() {
            let local = if finishing {
                f32::INFINITY
            } else {
                time - entry.offset
            };
            match &mut entry.segment {
                Segment::Tween(tween) => tween.seek(local),
                Segment::Interval(_) => {}
                Segment::Timeline(child) => {
                    if local >= 0.0 {
                        child.seek(local);
                    }
                }
            }
            if !self.is_active() {
                break;
            }
        }

        let state = {
            let mut inner = self.inner.borrow_mut();
            let added = mem::replace(&mut inner.entries, entries);
            inner.entries.extend(added);
            inner.seeking = false;
            inner.state
        };

        match state {
            AnimationState::Cancelled => {
                // Killed from a callback while the children were detached.
                self.kill_children();
                return;
            }
            AnimationState::Finished => return,
            AnimationState::Running => {}
        }

        let progress = if span > 0.0 {
            (time / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let on_update = self.inner.borrow_mut().on_update.take();
        if let Some(mut callback) = on_update {
            callback(progress);
            let mut inner = self.inner.borrow_mut();
            if inner.state == AnimationState::Running && inner.on_update.is_none() {
                inner.on_update = Some(callback);
            }
        }

        if finishing {
            self.finish();
        }
    }

    fn finish(&self) {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != AnimationState::Running {
                return;
            }
            inner.state = AnimationState::Finished;
            inner.elapsed = inner.span;
            inner.on_kill = None;
            inner.on_update = None;
            mem::take(&mut inner.on_complete)
        };
        for callback in callbacks {
            callback();
        }
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Timeline")
                .field("id", &inner.id)
                .field("state", &inner.state)
                .field("elapsed", &inner.elapsed)
                .field("duration", &inner.span)
                .field("segments", &inner.entries.len())
                .field("nested", &inner.nested)
                .finish(),
            Err(_) => f.write_str("Timeline { <busy> }"),
        }
    }
}

/// Clamp user-provided seconds to a finite, non-negative value.
pub(crate) fn sanitize_secs(secs: f32) -> f32 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}
