// SPDX-License-Identifier: MIT

//! In-process fan-out of [`Event`]s to HTTP subscribers. Each subscriber
//! gets a bounded channel (capacity 30); publish never blocks — a full
//! channel silently drops the message for that subscriber. Unlike a
//! durable bus, nothing here survives a process restart, matching the
//! "no durable persistence of runs" constraint: the event stream is a
//! live view, not a log.

use dropjob_core::Event;
use parking_lot::Mutex;
use tokio::sync::mpsc;

const SUBSCRIBER_CAPACITY: usize = 30;

#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<mpsc::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber, returning the receiving half of its
    /// channel.
    pub fn subscribe(&self) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        self.subscribers.lock().push(tx);
        rx
    }

    /// Publish to every subscriber. Disconnected subscribers are pruned;
    /// subscribers whose channel is full simply lose this message.
    pub fn publish(&self, event: Event) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
