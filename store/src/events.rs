//! Change event delivery.
//!
//! Events reach a sink only after their transaction commits, in commit
//! order, one per committed transition.

use crossbeam_channel::{Receiver, Sender};
use inv_core::ChangeEvent;
use parking_lot::Mutex;
use tracing::warn;

/// Receives committed change events.
///
/// `publish` runs before the next writer may commit, so it should hand the
/// event off rather than process it.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn publish(&self, _event: ChangeEvent) {}
}

/// Forwards events into a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<ChangeEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<ChangeEvent>) -> Self {
        Self { sender }
    }

    /// An unbounded channel and the sink feeding it.
    pub fn unbounded() -> (Self, Receiver<ChangeEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: ChangeEvent) {
        if let Err(err) = self.sender.send(event) {
            warn!(event = %err.0, "event receiver disconnected");
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: ChangeEvent) {
        self.events.lock().push(event);
    }
}
