//! # Events Module
//!
//! Progress reporting over channels.
//!
//! The core library emits events while scanning and hashing, and any
//! consumer (the CLI progress bar, a test harness) can subscribe. Sending
//! never blocks the pipeline: if nobody is listening, events are dropped.

mod types;

pub use types::*;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Sends events from the core library.
///
/// A thin wrapper around a crossbeam sender that can be cloned and moved
/// across threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event, discarding it silently if the receiver is gone.
    ///
    /// Progress reporting is optional; a dropped receiver must never stall
    /// a scan or hash worker.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events emitted by the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event arrives, or `None` once all senders are gone.
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Receive an event without blocking.
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate over events until every sender has been dropped.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (
        EventSender { inner: sender },
        EventReceiver { inner: receiver },
    )
}

/// A sender with no receiver, for callers that don't want progress events.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = channel();
    sender
}
