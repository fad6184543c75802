//! Screen-level states and the machine that switches between them.

pub mod idle;
pub mod machine;
pub mod screen;

pub use idle::IdleTimer;
pub use machine::{
    ParsePolicyError, State, StateId, StateMachine, StateRef, TransitionPolicy, WeakStateMachine,
};
pub use screen::ScreenState;
