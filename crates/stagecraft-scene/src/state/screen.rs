//! Screen states built from a canvas and a sequence.

use std::fmt;
use std::rc::Rc;

use super::machine::{State, StateId};
use crate::animation::sequence::SequenceController;
use crate::node::{Canvas, Shared};

/// A full screen: shown by playing its sequence forward, hidden by playing
/// it in reverse.
///
/// The canvas is enabled as soon as the screen is entered and disabled once
/// the reverse play has completed, so the exit animation stays visible
/// while it runs.
pub struct ScreenState<K> {
    id: K,
    canvas: Shared<Canvas>,
    sequence: SequenceController,
}

impl<K: StateId> ScreenState<K> {
    /// Create a hidden screen.
    pub fn new(id: K, canvas: Shared<Canvas>, sequence: SequenceController) -> Self {
        canvas.borrow_mut().enabled = false;
        Self {
            id,
            canvas,
            sequence,
        }
    }

    pub fn canvas(&self) -> &Shared<Canvas> {
        &self.canvas
    }

    pub fn is_visible(&self) -> bool {
        self.canvas.borrow().enabled
    }

    pub fn sequence(&self) -> &SequenceController {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut SequenceController {
        &mut self.sequence
    }
}

impl<K: StateId> State<K> for ScreenState<K> {
    fn id(&self) -> K {
        self.id
    }

    fn enter(&mut self) {
        self.canvas.borrow_mut().enabled = true;
        self.sequence.play_sequence(false);
    }

    fn exit(&mut self) -> f32 {
        let timeline = self.sequence.play_sequence(true);
        let canvas = Rc::downgrade(&self.canvas);
        let id = self.id;
        timeline.on_complete(move || {
            if let Some(canvas) = canvas.upgrade() {
                canvas.borrow_mut().enabled = false;
                log::debug!("screen {id:?} hidden");
            }
        });
        timeline.duration()
    }
}

impl<K: fmt::Debug> fmt::Debug for ScreenState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenState")
            .field("id", &self.id)
            .field("canvas", &self.canvas)
            .field("sequence", &self.sequence)
            .finish()
    }
}
