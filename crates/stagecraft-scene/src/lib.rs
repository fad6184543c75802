//! Reversible UI sequences and a guarded screen state machine.
//!
//! - [`animation`]: easing, timelines, animatables and sequence controllers
//! - [`state`]: states, the state machine and screen helpers
//! - [`node`]: the UI primitives the animations drive

pub mod animation;
pub mod node;
pub mod state;

pub use animation::{
    Animatable, AnimationRuntime, AnimationStep, EasingFunction, PropertyAnimatable,
    SequenceController, SequenceEvent, Timeline,
};
pub use node::{Canvas, CanvasGroup, RectLayout, RectTransform, Shared, shared};
pub use state::{IdleTimer, ScreenState, State, StateMachine, TransitionPolicy};
