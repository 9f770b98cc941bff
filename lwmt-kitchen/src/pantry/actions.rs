//! Pantry mutations
//!
//! Each action is a fire-and-forget directory write. None of them touch the
//! mirror; the change is observed through the next snapshot.

use std::sync::Arc;
use std::time::Duration;

use lwmt_common::models::{NewPantryItem, PantryItem, PantryItemUpdate};
use lwmt_common::time::parse_date_input;
use lwmt_common::{Error, Result};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::directory::Directory;

/// Pause before a finished item's document is deleted
pub const CONSUME_DELETE_DELAY: Duration = Duration::from_millis(500);

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields.";
pub const MSG_SIGN_IN_TO_ADD: &str = "Please sign in to add items.";
pub const MSG_SIGN_IN_TO_EDIT: &str = "Please sign in to edit items.";
pub const MSG_SIGN_IN_TO_VIEW: &str = "Please sign in to view your pantry.";

/// Raw add/edit form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PantryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub place: String,
}

impl PantryForm {
    /// All four fields are required
    pub fn validate(&self) -> Result<NewPantryItem> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        let expiry = self.expiry_date.trim();
        let place = self.place.trim();

        if name.is_empty() || quantity.is_empty() || expiry.is_empty() || place.is_empty() {
            return Err(Error::InvalidInput(MSG_FILL_ALL_FIELDS.to_string()));
        }

        let quantity: u32 = quantity
            .parse()
            .map_err(|_| Error::InvalidInput(MSG_FILL_ALL_FIELDS.to_string()))?;

        Ok(NewPantryItem {
            name: name.to_string(),
            quantity,
            place: place.parse()?,
            expiry_date: parse_date_input(expiry)?,
        })
    }
}

/// Result of eating one unit of an item
#[derive(Debug)]
pub enum ConsumeOutcome {
    /// Quantity written back one lower
    Decremented(u32),
    /// Last unit; the document is deleted after [`CONSUME_DELETE_DELAY`]
    Removing(JoinHandle<()>),
}

fn require_session<'a>(user_id: Option<&'a str>, message: &str) -> Result<&'a str> {
    user_id.ok_or_else(|| Error::SessionRequired(message.to_string()))
}

pub async fn add_item(
    directory: &dyn Directory,
    user_id: Option<&str>,
    form: &PantryForm,
) -> Result<String> {
    let item = form.validate()?;
    let user_id = require_session(user_id, MSG_SIGN_IN_TO_ADD)?;
    directory.add_pantry_item(user_id, item).await
}

/// Eat one unit of `item`, using the quantity currently rendered
///
/// A repeat within the delete window is not guarded against.
pub async fn consume_item(
    directory: Arc<dyn Directory>,
    user_id: &str,
    item: &PantryItem,
) -> Result<ConsumeOutcome> {
    if item.quantity > 1 {
        let remaining = item.quantity - 1;
        directory
            .update_pantry_item(user_id, &item.id, PantryItemUpdate::quantity(remaining))
            .await?;
        return Ok(ConsumeOutcome::Decremented(remaining));
    }

    let user_id = user_id.to_string();
    let item_id = item.id.clone();
    debug!(user_id = %user_id, item_id = %item_id, "Scheduling pantry item removal");
    let handle = tokio::spawn(async move {
        tokio::time::sleep(CONSUME_DELETE_DELAY).await;
        if let Err(e) = directory.delete_pantry_item(&user_id, &item_id).await {
            warn!(user_id = %user_id, item_id = %item_id, "Error eating item: {}", e);
        }
    });
    Ok(ConsumeOutcome::Removing(handle))
}

/// Point read used to prefill the edit form
pub async fn load_for_edit(
    directory: &dyn Directory,
    user_id: Option<&str>,
    item_id: &str,
) -> Result<PantryItem> {
    let user_id = require_session(user_id, MSG_SIGN_IN_TO_EDIT)?;
    directory
        .pantry_item(user_id, item_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Pantry item {}", item_id)))
}

pub async fn edit_item(
    directory: &dyn Directory,
    user_id: Option<&str>,
    item_id: &str,
    form: &PantryForm,
) -> Result<()> {
    let item = form.validate()?;
    let user_id = require_session(user_id, MSG_SIGN_IN_TO_EDIT)?;
    directory
        .update_pantry_item(user_id, item_id, PantryItemUpdate::from(item))
        .await
}

pub async fn remove_item(
    directory: &dyn Directory,
    user_id: Option<&str>,
    item_id: &str,
) -> Result<()> {
    let user_id = require_session(user_id, MSG_SIGN_IN_TO_VIEW)?;
    directory.delete_pantry_item(user_id, item_id).await
}
