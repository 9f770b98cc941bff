//! Event system for Less Waste, More Taste
//!
//! The directory publishes an event after every pantry write; pantry mirrors
//! subscribe through the EventBus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::PantryItem;

/// Directory change notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LwmtEvent {
    /// Full contents of a user's pantry collection after a write
    ///
    /// Items are ordered by expiry, soonest first.
    PantrySnapshot {
        user_id: String,
        items: Vec<PantryItem>,
        timestamp: DateTime<Utc>,
    },
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the directory)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use lwmt_common::events::{EventBus, LwmtEvent};
///
/// let bus = EventBus::new(100);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(LwmtEvent::PantrySnapshot {
///     user_id: "u1".to_string(),
///     items: vec![],
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LwmtEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LwmtEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: LwmtEvent) {
        let _ = self.tx.send(event);
    }
}
