//! Animation module for reversible UI sequences.
//!
//! This module provides:
//! - **Easing Functions**: Penner curves, CSS presets and the ease-inversion policy
//! - **Timelines**: Composable tweens driven by a frame-based runtime
//! - **Animatables**: Elements with a start and an end state that own one timeline
//! - **Sequences**: Ordered, reversible compositions of animatables
//!
//! # Architecture
//!
//! ```text
//! AnimationRuntime
//!   └── root Timelines (advanced every frame)
//!
//! SequenceController
//!   ├── AnimationStep (forward/reverse delay) ── Animatable ── Timeline
//!   └── outer Timeline (inner timelines inserted at step delays)
//! ```

pub mod animatable;
pub mod easing;
pub mod events;
pub mod interpolate;
pub mod property;
pub mod runtime;
pub mod sequence;
pub mod timeline;
pub mod types;

pub use animatable::{Animatable, Boundary, SharedAnimatable, TimelineSlot};
pub use easing::{EasingFunction, ParseEasingError, invert_ease};
pub use events::{DEFAULT_EVENT_CAPACITY, EventQueue, SequenceEvent};
pub use interpolate::Interpolate;
pub use property::{FadeSettings, PropertyAnimatable, PropertySettings, RectSettings, ScaleSettings};
pub use runtime::AnimationRuntime;
pub use sequence::{AnimationStep, DEFAULT_STEP_DELAY, SequenceController};
pub use timeline::{Insertion, Timeline, TimelineItem, Tween};
pub use types::{AnimatableProperty, AnimatableValue, AnimationId, AnimationState, Vec2, Vec3};
