//! Engine notification events.

use std::collections::VecDeque;

/// Notifications produced by engine operations, drained with
/// [`take_events`](crate::Engine::take_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A new asset finished decoding and became current.
    SongLoaded,
    /// Playback reached the natural end of the asset. Fires once per end;
    /// an explicit stop does not produce it.
    SongEnded,
    /// An export finished rendering and encoding.
    ExportCompleted,
}

/// FIFO queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<EngineEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: EngineEvent) {
        self.queue.push_back(event);
    }

    /// Remove and return all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.queue.drain(..).collect()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_order() {
        let mut queue = EventQueue::new();
        queue.push(EngineEvent::SongLoaded);
        queue.push(EngineEvent::ExportCompleted);

        assert_eq!(
            queue.drain(),
            vec![EngineEvent::SongLoaded, EngineEvent::ExportCompleted]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
