use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::types::ServiceStatus;

/// Fan-out of session statuses to every live subscriber.
///
/// Subscribing hands back a `Receiver`; dropping it unsubscribes, and the
/// sender is pruned on the next publish.
#[derive(Clone, Default)]
pub struct StatusBus {
    subscribers: Arc<Mutex<Vec<Sender<ServiceStatus>>>>,
}

impl StatusBus {
    pub fn subscribe(&self) -> Receiver<ServiceStatus> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    pub fn publish(&self, status: ServiceStatus) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(status.clone()).is_ok());
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}
