//! Event channel implementation using crossbeam-channel.
//!
//! The sanitization pipeline emits events from inside worker threads;
//! these wrappers make that safe and make the receiving side optional.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Sends events out of the pipeline.
///
/// Cloneable and shareable across worker threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is gone, the event is silently discarded; progress
    /// reporting must never stall or fail a batch.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives pipeline events on the subscriber side.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, `None` once all senders are gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Receive without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Collect everything currently queued, without blocking
    pub fn drain(&self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Iterate over events until all senders are dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for connected sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded event channel.
    ///
    /// The default choice: events are small and workers never block on
    /// the subscriber.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel with the specified capacity.
    ///
    /// Only useful when a slow subscriber should apply backpressure to
    /// the workers.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// An event sender with no receiver attached.
///
/// For running the pipeline without progress reporting (tests, scripting).
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
