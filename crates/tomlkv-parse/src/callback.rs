//! Callback trait for consuming parse events.

use crate::Event;

/// Receives parse events in grammar order.
pub trait ParseCallback {
    /// Handle one event. Return `false` to stop the parse early.
    fn event(&mut self, event: Event) -> bool;
}

/// Collecting events into a `Vec` is handy for tests and tools.
impl ParseCallback for Vec<Event> {
    fn event(&mut self, event: Event) -> bool {
        self.push(event);
        true
    }
}
