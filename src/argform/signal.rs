//! Synchronous change notification.
//!
//! [`Signal`] is the crate's stand-in for a toolkit signal: a list of slots
//! invoked in connection order, on the caller's thread, at the moment
//! `emit` is called. There is no queuing or batching.
//!
//! ## Re-entrancy
//!
//! A slot may re-enter the signal machinery while it runs: connect or
//! disconnect slots, emit again, or write back into the argument that fired.
//! Emission therefore iterates over a snapshot of the slot list taken before
//! any slot runs; mutations during delivery only affect later emissions.
//! Slots are `Fn` rather than `FnMut` so re-entrant delivery never needs a
//! runtime borrow of the slot itself.
//!
//! ## Threading
//!
//! Not thread-safe. Like everything in this crate, a `Signal` must stay on
//! the single logical thread that owns the parser (typically a UI thread).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`Signal::connect`], used to disconnect later.
pub type SlotId = usize;

/// An ordered list of callbacks fired synchronously with a payload.
pub struct Signal<T> {
    slots: RefCell<Vec<(SlotId, Rc<dyn Fn(&T)>)>>,
    next_id: Cell<SlotId>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Connect a slot; it will be called on every subsequent `emit`.
    pub fn connect(&self, slot: impl Fn(&T) + 'static) -> SlotId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, Rc::new(slot)));
        id
    }

    /// Remove a previously connected slot. Returns false if the id is
    /// unknown (already disconnected).
    pub fn disconnect(&self, id: SlotId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        slots.len() != before
    }

    /// Invoke every connected slot with `payload`, in connection order.
    pub fn emit(&self, payload: &T) {
        // Snapshot first so slots can connect/disconnect/emit re-entrantly.
        let snapshot: Vec<Rc<dyn Fn(&T)>> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, slot)| Rc::clone(slot))
            .collect();
        for slot in snapshot {
            slot(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.len())
            .finish()
    }
}
