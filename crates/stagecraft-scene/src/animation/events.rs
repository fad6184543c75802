//! Sequence events for transition lifecycle callbacks.
//!
//! A [`SequenceController`](super::sequence::SequenceController) reports
//! every transition it starts and finishes. Events are delivered to
//! subscribed listeners as they happen and also collected in an
//! [`EventQueue`] that can be drained after each frame.
//!
//! # Usage
//!
//! ```ignore
//! let runtime = AnimationRuntime::new();
//! let mut controller = SequenceController::new(runtime.clone(), steps);
//!
//! controller.play_sequence(false);
//! runtime.update(1.0 / 60.0);
//!
//! for event in controller.drain_events() {
//!     match event {
//!         SequenceEvent::Completed { interrupted: false, .. } => println!("shown"),
//!         _ => {}
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::AnimationId;

/// Event emitted when a sequence transition changes state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequenceEvent {
    /// A sequence started playing.
    Started {
        /// The outer timeline of the sequence.
        timeline: AnimationId,
        /// Whether the sequence plays backwards.
        reverse: bool,
    },
    /// A sequence stopped transitioning.
    Completed {
        /// The outer timeline of the sequence.
        timeline: AnimationId,
        /// Whether the sequence played backwards.
        reverse: bool,
        /// `true` when the sequence was killed instead of reaching its end.
        interrupted: bool,
    },
}

impl SequenceEvent {
    /// Get the timeline ID for this event.
    pub fn timeline(&self) -> AnimationId {
        match self {
            Self::Started { timeline, .. } | Self::Completed { timeline, .. } => *timeline,
        }
    }

    pub fn is_reverse(&self) -> bool {
        match self {
            Self::Started { reverse, .. } | Self::Completed { reverse, .. } => *reverse,
        }
    }

    /// Check if this is a "started" event.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    /// Check if this is a "completed" event.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Events kept by an [`EventQueue`] that is never drained.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Queue for collecting sequence events between frames.
///
/// The queue is bounded: once `capacity` events are waiting, pushing drops
/// the oldest one. Callers that only rely on listeners can ignore it.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<SequenceEvent>,
    capacity: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventQueue {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push an event onto the queue, dropping the oldest one when full.
    pub fn push(&mut self, event: SequenceEvent) {
        if self.events.len() >= self.capacity {
            if let Some(dropped) = self.events.pop_front() {
                log::debug!("event queue full; dropped {dropped:?}");
            }
        }
        self.events.push_back(event);
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event from the queue.
    pub fn pop(&mut self) -> Option<SequenceEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, returning an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = SequenceEvent> + '_ {
        self.events.drain(..)
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&SequenceEvent> {
        self.events.front()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = SequenceEvent::Completed {
            timeline: AnimationId(7),
            reverse: true,
            interrupted: false,
        };

        assert_eq!(event.timeline(), AnimationId(7));
        assert!(event.is_reverse());
        assert!(event.is_completed());
        assert!(!event.is_started());
    }

    #[test]
    fn test_event_queue_operations() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());

        queue.push(SequenceEvent::Started {
            timeline: AnimationId(1),
            reverse: false,
        });
        queue.push(SequenceEvent::Completed {
            timeline: AnimationId(1),
            reverse: false,
            interrupted: true,
        });
        assert_eq!(queue.len(), 2);
        assert!(queue.peek().unwrap().is_started());

        let event = queue.pop().unwrap();
        assert!(matches!(event, SequenceEvent::Started { .. }));
        assert_eq!(queue.len(), 1);

        let rest: Vec<_> = queue.drain().collect();
        assert_eq!(rest.len(), 1);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_event_serialization() {
        let event = SequenceEvent::Completed {
            timeline: AnimationId(42),
            reverse: true,
            interrupted: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"completed""#));
        assert!(json.contains("interrupted"));

        let parsed: SequenceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_event_queue_drops_oldest_when_full() {
        let mut queue = EventQueue::with_capacity(2);
        for id in 1..=3 {
            queue.push(SequenceEvent::Started {
                timeline: AnimationId(id),
                reverse: false,
            });
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 2);
        let ids: Vec<_> = queue.drain().map(|event| event.timeline()).collect();
        assert_eq!(ids, vec![AnimationId(2), AnimationId(3)]);
        assert_eq!(EventQueue::new().capacity(), DEFAULT_EVENT_CAPACITY);
    }
}
