//! Realtime chat side-channel: every message any client sends is rebroadcast to all.
//!
//! Nothing is persisted and there is no history. A client that falls more than the
//! channel capacity behind silently misses the oldest messages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

pub const DEFAULT_CHAT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct ChatHub {
    tx: broadcast::Sender<String>,
    connections: Arc<AtomicUsize>,
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Registers a listener. The returned guard counts as a live connection until dropped.
    pub fn join(&self) -> (broadcast::Receiver<String>, ConnectionGuard) {
        let rx = self.tx.subscribe();
        self.connections.fetch_add(1, Ordering::SeqCst);
        (
            rx,
            ConnectionGuard {
                connections: self.connections.clone(),
            },
        )
    }

    /// Sends `message` to every current listener; returns how many there were.
    pub fn publish(&self, message: String) -> usize {
        self.tx.send(message).unwrap_or(0)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_CAPACITY)
    }
}

pub struct ConnectionGuard {
    connections: Arc<AtomicUsize>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connections.fetch_sub(1, Ordering::SeqCst);
    }
}
