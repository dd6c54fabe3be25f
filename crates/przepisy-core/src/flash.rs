//! Transient Status
//!
//! A status that is shown for a fixed window and then reverts to its neutral
//! value. The core hands out a ticket; the UI owns the timer and redeems the
//! ticket when it fires. A ticket from an older status never clears a newer one.

use std::cell::Cell;
use std::time::Duration;

use crate::observable::Observable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "redeem the ticket with `expire` once the window elapses"]
pub struct RevertTicket {
    generation: u64,
    pub after: Duration,
}

pub struct FlashStatus<T> {
    status: Observable<T>,
    generation: Cell<u64>,
}

impl<T: Clone + Default + PartialEq> FlashStatus<T> {
    pub fn new() -> Self {
        Self {
            status: Observable::new(T::default()),
            generation: Cell::new(0),
        }
    }

    pub fn get(&self) -> T {
        self.status.get()
    }

    pub fn observable(&self) -> &Observable<T> {
        &self.status
    }

    /// Set a status that stays until replaced
    pub fn set(&self, value: T) {
        self.generation.set(self.generation.get() + 1);
        self.status.set(value);
    }

    /// Set a status that should revert after `window`
    pub fn show_for(&self, value: T, window: Duration) -> RevertTicket {
        self.set(value);
        RevertTicket {
            generation: self.generation.get(),
            after: window,
        }
    }

    /// Revert to neutral if nothing replaced the status since the ticket was
    /// issued. Returns whether it reverted.
    pub fn expire(&self, ticket: RevertTicket) -> bool {
        if ticket.generation != self.generation.get() {
            return false;
        }
        self.set(T::default());
        true
    }
}

impl<T: Clone + Default + PartialEq> Default for FlashStatus<T> {
    fn default() -> Self {
        Self::new()
    }
}
