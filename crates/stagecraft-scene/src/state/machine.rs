//! Guarded screen state machine.
//!
//! A [`StateMachine`] switches between [`State`]s one transition at a time:
//! the current state's [`State::exit`] returns how long its exit animation
//! runs, the machine waits that long on the animation runtime, then enters
//! the target state. While a transition is in flight,
//! [`StateMachine::transition_target_id`] names the state being entered.
//!
//! ```text
//!             change_state(B)
//!   Idle / A ───────────────► exit A ──► wait d ──► enter B ──► B
//!                               │  d == 0 ────────────▲
//!                               └─ abort_transition ──► no current state
//! ```
//!
//! The machine does not own its states: the table and the current/target
//! references are weak, so states live as long as whoever built them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::runtime::AnimationRuntime;
use crate::animation::timeline::Timeline;

/// Identity of a state.
pub trait StateId: Copy + Eq + Hash + fmt::Debug + 'static {}

impl<T: Copy + Eq + Hash + fmt::Debug + 'static> StateId for T {}

/// A screen-level state.
pub trait State<K: StateId> {
    fn id(&self) -> K;

    /// Called once the state becomes current.
    fn enter(&mut self);

    /// Called when the machine leaves the state. Returns how many seconds
    /// the machine waits before entering the next state.
    fn exit(&mut self) -> f32;
}

/// State shared between its owner and the machine.
pub type StateRef<K> = Rc<RefCell<dyn State<K>>>;

type WeakState<K> = Weak<RefCell<dyn State<K>>>;

/// What a `change_state` does while another transition is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Refuse the request.
    #[default]
    Reject,
    /// Cancel the pending entry and head for the new target instead,
    /// as long as the machine is still waiting for the exit to finish.
    Supersede,
}

impl TransitionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Supersede => "supersede",
        }
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transition policy: {0} (expected `reject` or `supersede`)")]
pub struct ParsePolicyError(pub String);

impl FromStr for TransitionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "supersede" => Ok(Self::Supersede),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

struct Slot<K> {
    id: K,
    state: WeakState<K>,
}

impl<K: Copy> Clone for Slot<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            state: self.state.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Exiting,
    Waiting,
    Entering,
}

struct Pending<K> {
    target: Slot<K>,
    phase: Phase,
    wait: Option<Timeline>,
}

struct MachineInner<K> {
    states: HashMap<K, WeakState<K>>,
    current: Option<Slot<K>>,
    pending: Option<Pending<K>>,
    policy: TransitionPolicy,
}

/// Handle to a state machine. Clones share the same machine.
pub struct StateMachine<K: StateId> {
    inner: Rc<RefCell<MachineInner<K>>>,
    runtime: AnimationRuntime,
}

impl<K: StateId> Clone for StateMachine<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

/// Non-owning handle to a [`StateMachine`].
pub struct WeakStateMachine<K: StateId> {
    inner: Weak<RefCell<MachineInner<K>>>,
    runtime: AnimationRuntime,
}

impl<K: StateId> Clone for WeakStateMachine<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<K: StateId> WeakStateMachine<K> {
    pub fn upgrade(&self) -> Option<StateMachine<K>> {
        Some(StateMachine {
            inner: self.inner.upgrade()?,
            runtime: self.runtime.clone(),
        })
    }
}

impl<K: StateId> StateMachine<K> {
    /// Create an empty machine with no current state.
    pub fn new(runtime: AnimationRuntime) -> Self {
        Self::with_policy(runtime, TransitionPolicy::default())
    }

    pub fn with_policy(runtime: AnimationRuntime, policy: TransitionPolicy) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MachineInner {
                states: HashMap::new(),
                current: None,
                pending: None,
                policy,
            })),
            runtime,
        }
    }

    pub fn downgrade(&self) -> WeakStateMachine<K> {
        WeakStateMachine {
            inner: Rc::downgrade(&self.inner),
            runtime: self.runtime.clone(),
        }
    }

    /// Add a state to the lookup table, replacing any state with the same id.
    pub fn register(&self, state: StateRef<K>) {
        let id = state.borrow().id();
        let replaced = self
            .inner
            .borrow_mut()
            .states
            .insert(id, Rc::downgrade(&state));
        if replaced.is_some_and(|old| !old.ptr_eq(&Rc::downgrade(&state))) {
            log::warn!("state {id:?} registered twice; keeping the newer one");
        }
    }

    /// Request a transition to the registered state `id`.
    ///
    /// Returns `false` without side effects if `id` is unknown, its state was
    /// dropped, it is already current, or another transition is in flight
    /// and the policy does not allow superseding it.
    pub fn change_state(&self, id: K) -> bool {
        let state = self.inner.borrow().states.get(&id).and_then(Weak::upgrade);
        match state {
            Some(state) => self.change_state_to(state),
            None => {
                log::debug!("change_state({id:?}) rejected: not registered");
                false
            }
        }
    }

    /// Request a transition to `state`, registered or not.
    pub fn change_state_to(&self, state: StateRef<K>) -> bool {
        let Ok(id) = state.try_borrow().map(|state| state.id()) else {
            log::debug!("change_state rejected: target state is busy");
            return false;
        };
        let target = Slot {
            id,
            state: Rc::downgrade(&state),
        };

        let supersede = {
            let inner = self.inner.borrow();
            if inner
                .current
                .as_ref()
                .is_some_and(|current| current.state.ptr_eq(&target.state))
            {
                log::debug!("change_state({id:?}) rejected: already current");
                return false;
            }
            match &inner.pending {
                None => false,
                Some(pending) if pending.target.state.ptr_eq(&target.state) => {
                    log::debug!("change_state({id:?}) rejected: already the target");
                    return false;
                }
                Some(pending)
                    if inner.policy == TransitionPolicy::Supersede
                        && pending.phase == Phase::Waiting =>
                {
                    true
                }
                Some(pending) => {
                    log::debug!(
                        "change_state({id:?}) rejected: transition to {:?} in flight",
                        pending.target.id
                    );
                    return false;
                }
            }
        };

        if supersede {
            self.supersede(target);
        } else {
            self.begin(target);
        }
        true
    }

    fn begin(&self, target: Slot<K>) {
        let id = target.id;
        let previous = {
            let mut inner = self.inner.borrow_mut();
            inner.pending = Some(Pending {
                target,
                phase: Phase::Exiting,
                wait: None,
            });
            inner.current.clone()
        };

        let mut duration = 0.0;
        if let Some(previous) = previous {
            match previous.state.upgrade() {
                Some(state) => match state.try_borrow_mut() {
                    Ok(mut state) => {
                        log::info!("exiting state {:?}", previous.id);
                        duration = state.exit();
                    }
                    Err(_) => log::warn!("state {:?} is busy; exit skipped", previous.id),
                },
                None => log::debug!("state {:?} was dropped; exit skipped", previous.id),
            }
        }

        if !(duration >= 0.0 && duration.is_finite()) {
            log::warn!("exit returned invalid duration {duration}; entering {id:?} now");
            duration = 0.0;
        }

        // `exit` may have aborted the transition.
        if self.inner.borrow().pending.is_none() {
            return;
        }
        self.schedule(duration);
    }

    /// Retarget a transition that is waiting for its exit to finish.
    fn supersede(&self, target: Slot<K>) {
        let (old_id, wait) = {
            let mut inner = self.inner.borrow_mut();
            let Some(pending) = inner.pending.as_mut() else {
                return;
            };
            let old_id = pending.target.id;
            pending.target = target;
            (old_id, pending.wait.take())
        };

        let remaining = match wait {
            Some(wait) => {
                let remaining = (wait.duration() - wait.elapsed()).max(0.0);
                wait.kill(false);
                remaining
            }
            None => 0.0,
        };
        log::info!("transition to {old_id:?} superseded; {remaining}s of exit left");
        self.schedule(remaining);
    }

    fn schedule(&self, duration: f32) {
        if duration <= 0.0 {
            self.finish();
            return;
        }

        let wait = self.runtime.delay(duration);
        let machine = self.downgrade();
        wait.on_complete(move || {
            if let Some(machine) = machine.upgrade() {
                machine.finish();
            }
        });

        if let Some(pending) = self.inner.borrow_mut().pending.as_mut() {
            pending.phase = Phase::Waiting;
            pending.wait = Some(wait);
        }
    }

    fn finish(&self) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            let Some(pending) = inner.pending.as_mut() else {
                return;
            };
            pending.phase = Phase::Entering;
            pending.wait = None;
            let target = pending.target.clone();
            inner.current = Some(target.clone());
            target
        };

        match target.state.upgrade() {
            Some(state) => match state.try_borrow_mut() {
                Ok(mut state) => {
                    log::info!("entering state {:?}", target.id);
                    state.enter();
                }
                Err(_) => log::warn!("state {:?} is busy; enter skipped", target.id),
            },
            None => log::warn!("state {:?} was dropped before entering", target.id),
        }

        self.inner.borrow_mut().pending = None;
    }

    /// Cancel a transition before its target is entered.
    ///
    /// The state being left has already exited, so the machine ends up with
    /// no current state. Returns `false` if nothing could be aborted.
    pub fn abort_transition(&self) -> bool {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            match &inner.pending {
                Some(pending) if pending.phase != Phase::Entering => {}
                _ => return false,
            }
            inner.current = None;
            inner.pending.take()
        };

        if let Some(pending) = pending {
            log::info!("transition to {:?} aborted", pending.target.id);
            if let Some(wait) = pending.wait {
                wait.kill(false);
            }
        }
        true
    }

    pub fn current_id(&self) -> Option<K> {
        self.inner.borrow().current.as_ref().map(|slot| slot.id)
    }

    pub fn current_state(&self) -> Option<StateRef<K>> {
        self.inner
            .borrow()
            .current
            .as_ref()
            .and_then(|slot| slot.state.upgrade())
    }

    /// Id of the state being transitioned to, while a transition is in flight.
    pub fn transition_target_id(&self) -> Option<K> {
        self.inner
            .borrow()
            .pending
            .as_ref()
            .map(|pending| pending.target.id)
    }

    pub fn transition_target(&self) -> Option<StateRef<K>> {
        self.inner
            .borrow()
            .pending
            .as_ref()
            .and_then(|pending| pending.target.state.upgrade())
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Look up a registered state that is still alive.
    pub fn state(&self, id: K) -> Option<StateRef<K>> {
        self.inner.borrow().states.get(&id).and_then(Weak::upgrade)
    }

    pub fn contains(&self, id: K) -> bool {
        self.state(id).is_some()
    }

    /// Number of registered states, including dropped ones.
    pub fn len(&self) -> usize {
        self.inner.borrow().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.inner.borrow().policy
    }

    pub fn set_policy(&self, policy: TransitionPolicy) {
        self.inner.borrow_mut().policy = policy;
    }

    pub fn runtime(&self) -> &AnimationRuntime {
        &self.runtime
    }
}

impl<K: StateId> fmt::Debug for StateMachine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_id())
            .field("target", &self.transition_target_id())
            .field("policy", &self.policy())
            .field("states", &self.len())
            .finish()
    }
}
