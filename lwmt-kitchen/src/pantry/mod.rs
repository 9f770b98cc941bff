//! Pantry mirror and pantry mutations
//!
//! The mirror holds the signed-in user's pantry as last pushed by the
//! directory. It is replaced wholesale on every notification and never
//! patched with local writes; mutations go to the directory and show up
//! here only when the next snapshot arrives.

pub mod actions;

use std::sync::Arc;

use lwmt_common::events::LwmtEvent;
use lwmt_common::models::{LocationFilter, PantryItem};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::directory::Directory;

pub use actions::{ConsumeOutcome, PantryForm, CONSUME_DELETE_DELAY};

/// Mirror contents; `None` until the first snapshot arrives
pub type PantrySnapshot = Option<Vec<PantryItem>>;

/// Live copy of one user's pantry collection
pub struct PantryMirror {
    user_id: String,
    rx: watch::Receiver<PantrySnapshot>,
    task: JoinHandle<()>,
}

impl PantryMirror {
    /// Subscribe to the user's collection and start mirroring it
    ///
    /// The notification subscription is taken before the initial load so no
    /// write between the two is missed.
    pub fn start(directory: Arc<dyn Directory>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let (tx, rx) = watch::channel(None);
        let events = directory.subscribe();

        info!(user_id = %user_id, "Starting pantry mirror");
        let task = tokio::spawn(run_mirror(directory, user_id.clone(), events, tx));

        Self { user_id, rx, task }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Items on the given tab, ordered by expiry
    pub fn filtered(&self, filter: LocationFilter) -> PantrySnapshot {
        self.rx.borrow().as_ref().map(|items| {
            items
                .iter()
                .filter(|item| filter.matches(item))
                .cloned()
                .collect()
        })
    }

    /// Item as currently rendered
    pub fn item(&self, item_id: &str) -> Option<PantryItem> {
        self.rx
            .borrow()
            .as_ref()
            .and_then(|items| items.iter().find(|item| item.id == item_id).cloned())
    }

    /// Receiver that changes on every replacement
    pub fn watch(&self) -> watch::Receiver<PantrySnapshot> {
        self.rx.clone()
    }
}

impl Drop for PantryMirror {
    fn drop(&mut self) {
        debug!(user_id = %self.user_id, "Stopping pantry mirror");
        self.task.abort();
    }
}

async fn run_mirror(
    directory: Arc<dyn Directory>,
    user_id: String,
    mut events: broadcast::Receiver<LwmtEvent>,
    tx: watch::Sender<PantrySnapshot>,
) {
    reload(directory.as_ref(), &user_id, &tx).await;

    loop {
        match events.recv().await {
            Ok(LwmtEvent::PantrySnapshot {
                user_id: owner,
                items,
                ..
            }) => {
                if owner == user_id {
                    debug!(user_id = %user_id, count = items.len(), "Pantry snapshot received");
                    replace(&tx, items);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(user_id = %user_id, skipped, "Pantry mirror lagged, reloading");
                reload(directory.as_ref(), &user_id, &tx).await;
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!(user_id = %user_id, "Directory notifications closed");
                break;
            }
        }
    }
}

async fn reload(directory: &dyn Directory, user_id: &str, tx: &watch::Sender<PantrySnapshot>) {
    match directory.pantry_items(user_id).await {
        Ok(items) => replace(tx, items),
        Err(e) => warn!(user_id = %user_id, "Error listening to pantry collection: {}", e),
    }
}

fn replace(tx: &watch::Sender<PantrySnapshot>, mut items: Vec<PantryItem>) {
    items.sort_by_key(|item| item.expiry_date);
    tx.send_replace(Some(items));
}
