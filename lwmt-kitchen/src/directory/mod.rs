//! Remote directory service: accounts, per-user documents, push notifications
//!
//! Every write to a user's pantry collection is followed by a
//! `LwmtEvent::PantrySnapshot` carrying the whole collection, which is what
//! the pantry mirror consumes. The directory is the single source of truth;
//! callers never merge their own writes into local state.

use async_trait::async_trait;
use lwmt_common::events::LwmtEvent;
use lwmt_common::models::{
    Account, NewPantryItem, PantryItem, PantryItemUpdate, Profile, SavedRecipe,
};
use lwmt_common::Result;
use std::collections::HashSet;
use tokio::sync::broadcast;

mod sqlite;

pub use sqlite::SqliteDirectory;

/// Capacity of the change-notification channel
pub const EVENT_CAPACITY: usize = 256;

#[async_trait]
pub trait Directory: Send + Sync {
    /// Create an account and its profile document
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Account>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account>;

    async fn profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Whole pantry collection ordered by expiry, soonest first
    async fn pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>>;

    async fn pantry_item(&self, user_id: &str, item_id: &str) -> Result<Option<PantryItem>>;

    /// Returns the new document id
    async fn add_pantry_item(&self, user_id: &str, item: NewPantryItem) -> Result<String>;

    /// Fails with `NotFound` when the document does not exist
    async fn update_pantry_item(
        &self,
        user_id: &str,
        item_id: &str,
        update: PantryItemUpdate,
    ) -> Result<()>;

    /// Deleting a missing document is not an error
    async fn delete_pantry_item(&self, user_id: &str, item_id: &str) -> Result<()>;

    async fn saved_recipe(&self, user_id: &str, recipe_id: i64) -> Result<Option<SavedRecipe>>;

    async fn put_saved_recipe(&self, user_id: &str, recipe: &SavedRecipe) -> Result<()>;

    async fn delete_saved_recipe(&self, user_id: &str, recipe_id: i64) -> Result<()>;

    /// Saved recipes, most recently saved first
    async fn saved_recipes(&self, user_id: &str) -> Result<Vec<SavedRecipe>>;

    async fn saved_recipe_ids(&self, user_id: &str) -> Result<HashSet<i64>>;

    /// Subscribe to change notifications for all users
    fn subscribe(&self) -> broadcast::Receiver<LwmtEvent>;
}
