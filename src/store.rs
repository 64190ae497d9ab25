//! Last-known event list.

use crate::events::Event;

/// Holds the most recent event batch.
///
/// Every successful fetch is authoritative: the whole sequence is swapped,
/// never merged, and the API order is kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn current(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
