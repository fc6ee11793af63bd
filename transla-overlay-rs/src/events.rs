//! Package-local broadcasts between controllers.
//!
//! The mask controller publishes its visibility; the service drains the bus
//! after every turn and forwards each event to the bubble controller.

use std::sync::mpsc::{self, Receiver, Sender};

/// Visibility change of the translation mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    OverlayShown,
    OverlayHidden,
}

/// Sending half handed to publishers.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: Sender<OverlayEvent>,
}

impl EventPublisher {
    pub fn publish(&self, event: OverlayEvent) {
        tracing::debug!(?event, "Broadcasting overlay event");
        if self.sender.send(event).is_err() {
            tracing::warn!(?event, "Overlay event dropped, bus closed");
        }
    }
}

/// FIFO event bus owned by the service.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<OverlayEvent>,
    receiver: Receiver<OverlayEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Take every pending event in publish order.
    pub fn drain(&self) -> Vec<OverlayEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
