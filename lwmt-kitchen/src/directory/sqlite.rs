//! SQLite-backed directory
//!
//! Documents live in plain tables keyed by owner. Saved recipes are stored as
//! one JSON document per row, pantry items as columns so the expiry ordering
//! query stays in SQL.

use async_trait::async_trait;
use chrono::Utc;
use lwmt_common::auth::{
    generate_salt, hash_password, is_plausible_email, normalize_email, verify_password,
    MIN_PASSWORD_LEN,
};
use lwmt_common::events::{EventBus, LwmtEvent};
use lwmt_common::models::{
    Account, NewPantryItem, PantryItem, PantryItemUpdate, Profile, SavedRecipe,
};
use lwmt_common::time::from_millis;
use lwmt_common::{Error, Result};
use sqlx::SqlitePool;
use std::collections::HashSet;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Directory, EVENT_CAPACITY};

type PantryRow = (String, String, i64, String, i64, i64);

const PANTRY_COLUMNS: &str = "guid, name, quantity, place, expiry_ms, added_at_ms";

pub struct SqliteDirectory {
    db: SqlitePool,
    events: EventBus,
    /// Held from a pantry write until its snapshot is emitted, so snapshots
    /// go out in commit order
    pantry_writes: Mutex<()>,
}

impl SqliteDirectory {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            events: EventBus::new(EVENT_CAPACITY),
            pantry_writes: Mutex::new(()),
        }
    }

    /// Directory over a fresh in-memory database
    pub async fn in_memory() -> Result<Self> {
        let db = lwmt_common::db::init_memory_database().await?;
        Ok(Self::new(db))
    }

    /// Push the user's whole pantry collection to subscribers
    async fn publish_pantry(&self, user_id: &str) {
        match self.pantry_items(user_id).await {
            Ok(items) => {
                debug!(user_id = %user_id, count = items.len(), "Publishing pantry snapshot");
                self.events.emit_lossy(LwmtEvent::PantrySnapshot {
                    user_id: user_id.to_string(),
                    items,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => warn!(user_id = %user_id, "Pantry snapshot failed: {}", e),
        }
    }
}

fn pantry_from_row(row: PantryRow) -> Result<PantryItem> {
    let (id, name, quantity, place, expiry_ms, added_at_ms) = row;
    Ok(PantryItem {
        id,
        name,
        quantity: u32::try_from(quantity)
            .map_err(|_| Error::Internal(format!("Invalid stored quantity: {}", quantity)))?,
        place: place.parse()?,
        expiry_date: from_millis(expiry_ms)?,
        added_at: from_millis(added_at_ms)?,
    })
}

#[async_trait]
impl Directory for SqliteDirectory {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Account> {
        let email = normalize_email(email);
        if !is_plausible_email(&email) {
            return Err(Error::Auth("Invalid email address".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if full_name.trim().is_empty() {
            return Err(Error::Auth("Full name is required".to_string()));
        }

        let existing: Option<String> = sqlx::query_scalar("SELECT guid FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.db)
            .await?;
        if existing.is_some() {
            return Err(Error::Auth("Email already in use".to_string()));
        }

        let user_id = Uuid::new_v4().to_string();
        let salt = generate_salt();
        let hash = hash_password(&salt, password);

        let mut tx = self.db.begin().await?;
        sqlx::query(
            "INSERT INTO users (guid, email, password_hash, password_salt) VALUES (?, ?, ?, ?)",
        )
        .bind(&user_id)
        .bind(&email)
        .bind(&hash)
        .bind(&salt)
        .execute(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO profiles (user_id, full_name, email) VALUES (?, ?, ?)")
            .bind(&user_id)
            .bind(full_name.trim())
            .bind(&email)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(user_id = %user_id, "Account created");
        Ok(Account { user_id, email })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account> {
        let email = normalize_email(email);
        let row: Option<(String, String, String)> = sqlx::query_as(
            "SELECT guid, password_hash, password_salt FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some((user_id, hash, salt)) if verify_password(&salt, password, &hash) => {
                info!(user_id = %user_id, "Signed in");
                Ok(Account { user_id, email })
            }
            _ => Err(Error::Auth("Invalid email or password".to_string())),
        }
    }

    async fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT full_name, email FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.map(|(full_name, email)| Profile { full_name, email }))
    }

    async fn pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>> {
        let rows: Vec<PantryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM pantry_items WHERE user_id = ? ORDER BY expiry_ms ASC",
            PANTRY_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(pantry_from_row).collect()
    }

    async fn pantry_item(&self, user_id: &str, item_id: &str) -> Result<Option<PantryItem>> {
        let row: Option<PantryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM pantry_items WHERE user_id = ? AND guid = ?",
            PANTRY_COLUMNS
        ))
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(pantry_from_row).transpose()
    }

    async fn add_pantry_item(&self, user_id: &str, item: NewPantryItem) -> Result<String> {
        let item_id = Uuid::new_v4().to_string();
        let _write = self.pantry_writes.lock().await;
        sqlx::query(
            "INSERT INTO pantry_items (guid, user_id, name, quantity, place, expiry_ms, added_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item_id)
        .bind(user_id)
        .bind(&item.name)
        .bind(i64::from(item.quantity))
        .bind(item.place.as_str())
        .bind(item.expiry_date.timestamp_millis())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.db)
        .await?;

        debug!(user_id = %user_id, item_id = %item_id, name = %item.name, "Pantry item added");
        self.publish_pantry(user_id).await;
        Ok(item_id)
    }

    async fn update_pantry_item(
        &self,
        user_id: &str,
        item_id: &str,
        update: PantryItemUpdate,
    ) -> Result<()> {
        let _write = self.pantry_writes.lock().await;
        let current = self
            .pantry_item(user_id, item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No document to update: {}", item_id)))?;

        let name = update.name.unwrap_or(current.name);
        let quantity = update.quantity.unwrap_or(current.quantity);
        let place = update.place.unwrap_or(current.place);
        let expiry = update.expiry_date.unwrap_or(current.expiry_date);

        sqlx::query(
            "UPDATE pantry_items SET name = ?, quantity = ?, place = ?, expiry_ms = ?
             WHERE user_id = ? AND guid = ?",
        )
        .bind(&name)
        .bind(i64::from(quantity))
        .bind(place.as_str())
        .bind(expiry.timestamp_millis())
        .bind(user_id)
        .bind(item_id)
        .execute(&self.db)
        .await?;

        debug!(user_id = %user_id, item_id = %item_id, quantity, "Pantry item updated");
        self.publish_pantry(user_id).await;
        Ok(())
    }

    async fn delete_pantry_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        let _write = self.pantry_writes.lock().await;
        let result = sqlx::query("DELETE FROM pantry_items WHERE user_id = ? AND guid = ?")
            .bind(user_id)
            .bind(item_id)
            .execute(&self.db)
            .await?;

        debug!(
            user_id = %user_id,
            item_id = %item_id,
            deleted = result.rows_affected(),
            "Pantry item delete"
        );
        self.publish_pantry(user_id).await;
        Ok(())
    }

    async fn saved_recipe(&self, user_id: &str, recipe_id: i64) -> Result<Option<SavedRecipe>> {
        let document: Option<String> = sqlx::query_scalar(
            "SELECT document FROM saved_recipes WHERE user_id = ? AND recipe_id = ?",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?;

        document
            .map(|doc| serde_json::from_str(&doc).map_err(Error::from))
            .transpose()
    }

    async fn put_saved_recipe(&self, user_id: &str, recipe: &SavedRecipe) -> Result<()> {
        let document = serde_json::to_string(recipe)?;
        sqlx::query(
            "INSERT INTO saved_recipes (user_id, recipe_id, document, saved_at_ms) VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id, recipe_id) DO UPDATE SET document = excluded.document,
                 saved_at_ms = excluded.saved_at_ms",
        )
        .bind(user_id)
        .bind(recipe.id)
        .bind(&document)
        .bind(recipe.saved_at.timestamp_millis())
        .execute(&self.db)
        .await?;

        debug!(user_id = %user_id, recipe_id = recipe.id, "Saved recipe stored");
        Ok(())
    }

    async fn delete_saved_recipe(&self, user_id: &str, recipe_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM saved_recipes WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.db)
            .await?;

        debug!(user_id = %user_id, recipe_id, "Saved recipe deleted");
        Ok(())
    }

    async fn saved_recipes(&self, user_id: &str) -> Result<Vec<SavedRecipe>> {
        let documents: Vec<String> = sqlx::query_scalar(
            "SELECT document FROM saved_recipes WHERE user_id = ? ORDER BY saved_at_ms DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(Error::from))
            .collect()
    }

    async fn saved_recipe_ids(&self, user_id: &str) -> Result<HashSet<i64>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT recipe_id FROM saved_recipes WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?;
        Ok(ids.into_iter().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<LwmtEvent> {
        self.events.subscribe()
    }
}
