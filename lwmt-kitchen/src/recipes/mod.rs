//! Recipe search, detail cache and saved-recipe toggling
//!
//! [`RecipeBook`] holds one browser's ingredient selection, last search
//! result, detail cache and saved-id set. Its lock is never held across an
//! API or directory call: each operation reads what it needs, releases,
//! awaits, then re-locks to apply the result. Two overlapping searches can
//! therefore complete out of order; the later completion wins.

pub mod api;
pub mod selection;
pub mod store;

use std::collections::{HashMap, HashSet};

use lwmt_common::models::{PantryItem, RecipeDetail, RecipeSummary, SavedRecipe};
use lwmt_common::{Error, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::directory::Directory;

pub use api::{RecipeApi, SpoonacularClient};
pub use selection::{IngredientSelection, DEFAULT_QUICK_ADD};
pub use store::{FileStore, LocalStore, MemoryStore, RecipeCache};

pub const MSG_NO_INGREDIENTS: &str = "Please add some ingredients first!";
pub const MSG_NO_RESULTS: &str = "No recipes found with those ingredients. Try adding more!";
pub const MSG_SEARCH_FAILED: &str =
    "Failed to load recipes. Please check your API key and try again.";
pub const MSG_DETAIL_FAILED: &str = "Failed to load recipe details. Please try again.";
pub const MSG_LOGIN_TO_SAVE: &str = "Please log in to save recipes!";
pub const MSG_RECIPE_DATA_MISSING: &str = "Failed to save recipe. Recipe data is missing.";
pub const MSG_SAVE_DETAIL_FAILED: &str = "Failed to get full recipe details. Please try again.";
pub const MSG_SAVE_FAILED: &str = "Failed to save the recipe. Please try again.";
pub const MSG_UNSAVED: &str = "Recipe unsaved successfully!";

/// What the last search attempt produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty selection; no request was made
    NoIngredients,
    /// Results replaced the cached list
    Found(usize),
    /// Request succeeded with nothing; cache untouched
    NoResults,
    /// Request failed; cache untouched
    Failed,
}

impl SearchOutcome {
    /// Inline message shown in place of the cards
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::NoIngredients => Some(MSG_NO_INGREDIENTS),
            SearchOutcome::Found(_) => None,
            SearchOutcome::NoResults => Some(MSG_NO_RESULTS),
            SearchOutcome::Failed => Some(MSG_SEARCH_FAILED),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SearchOutcome::NoIngredients | SearchOutcome::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Unsaved,
}

/// Pills offered under the ingredient input
#[derive(Debug, Clone, PartialEq)]
pub enum QuickAdd {
    /// The user's pantry, ordered by expiry
    Pantry(Vec<PantryItem>),
    Defaults,
}

impl QuickAdd {
    pub fn title(&self) -> &'static str {
        match self {
            QuickAdd::Pantry(_) => "Quickly add items from your kitchen",
            QuickAdd::Defaults => "Quickly add common ingredients",
        }
    }

    /// Pantry pills when signed in and readable, the default list otherwise
    pub async fn load(directory: &dyn Directory, user_id: Option<&str>) -> Self {
        let Some(user_id) = user_id else {
            return QuickAdd::Defaults;
        };
        match directory.pantry_items(user_id).await {
            Ok(items) => QuickAdd::Pantry(items),
            Err(e) => {
                warn!(user_id = %user_id, "Error fetching user's pantry: {}", e);
                QuickAdd::Defaults
            }
        }
    }
}

#[derive(Default)]
struct BookState {
    selection: IngredientSelection,
    summaries: Vec<RecipeSummary>,
    details: HashMap<i64, RecipeDetail>,
    saved_ids: HashSet<i64>,
    last_outcome: Option<SearchOutcome>,
}

pub struct RecipeBook {
    state: RwLock<BookState>,
    cache: RecipeCache,
    /// Orders local-store writes; taken after the state lock is released
    flush: Mutex<()>,
}

impl RecipeBook {
    /// Restore the last search result and detail cache from the local store
    pub fn new(cache: RecipeCache) -> Self {
        let summaries = cache.load_summaries();
        let details = cache.load_details();
        if !summaries.is_empty() {
            debug!(count = summaries.len(), "Recipes loaded from local store");
        }

        Self {
            state: RwLock::new(BookState {
                summaries,
                details,
                ..Default::default()
            }),
            cache,
            flush: Mutex::new(()),
        }
    }

    pub async fn selection(&self) -> IngredientSelection {
        self.state.read().await.selection.clone()
    }

    pub async fn add_ingredient(&self, ingredient: &str) -> bool {
        self.state.write().await.selection.add(ingredient)
    }

    pub async fn remove_ingredient(&self, ingredient: &str) -> bool {
        self.state.write().await.selection.remove(ingredient)
    }

    pub async fn summaries(&self) -> Vec<RecipeSummary> {
        self.state.read().await.summaries.clone()
    }

    pub async fn saved_ids(&self) -> HashSet<i64> {
        self.state.read().await.saved_ids.clone()
    }

    pub async fn is_saved(&self, recipe_id: i64) -> bool {
        self.state.read().await.saved_ids.contains(&recipe_id)
    }

    /// Outcome of the last search, cleared once read
    pub async fn take_outcome(&self) -> Option<SearchOutcome> {
        self.state.write().await.last_outcome.take()
    }

    /// Search by the current selection
    pub async fn search(&self, api: &dyn RecipeApi, limit: u32) -> SearchOutcome {
        let ingredients = self.state.read().await.selection.items().to_vec();

        let outcome = if ingredients.is_empty() {
            SearchOutcome::NoIngredients
        } else {
            match api.find_by_ingredients(&ingredients, limit).await {
                Ok(recipes) if recipes.is_empty() => SearchOutcome::NoResults,
                Ok(recipes) => {
                    let count = recipes.len();
                    self.state.write().await.summaries = recipes;
                    self.persist_summaries().await;
                    info!(count, "Recipe search returned results");
                    SearchOutcome::Found(count)
                }
                Err(e) => {
                    error!("Error generating recipe: {}", e);
                    SearchOutcome::Failed
                }
            }
        };

        self.state.write().await.last_outcome = Some(outcome);
        outcome
    }

    /// Detail of a fetched recipe, hitting the network at most once per id
    pub async fn detail(&self, api: &dyn RecipeApi, recipe_id: i64) -> Result<RecipeDetail> {
        {
            let state = self.state.read().await;
            if !state.summaries.iter().any(|r| r.id == recipe_id) {
                return Err(Error::NotFound(format!("Recipe not found: {}", recipe_id)));
            }
            if let Some(detail) = state.details.get(&recipe_id) {
                debug!(recipe_id, "Recipe detail from cache");
                return Ok(detail.clone());
            }
        }

        self.fetch_detail(api, recipe_id).await
    }

    async fn fetch_detail(&self, api: &dyn RecipeApi, recipe_id: i64) -> Result<RecipeDetail> {
        let detail = api.recipe_information(recipe_id).await?;

        self.state
            .write()
            .await
            .details
            .insert(recipe_id, detail.clone());
        self.persist_details().await;
        Ok(detail)
    }

    /// Write the current summaries to the local store
    ///
    /// The value is read under the flush lock, so the last write always
    /// carries the latest list.
    async fn persist_summaries(&self) {
        let _flush = self.flush.lock().await;
        let summaries = self.state.read().await.summaries.clone();
        if let Err(e) = self.cache.store_summaries(&summaries).await {
            warn!("Failed to persist recipes: {}", e);
        }
    }

    async fn persist_details(&self) {
        let _flush = self.flush.lock().await;
        let details = self.state.read().await.details.clone();
        if let Err(e) = self.cache.store_details(&details).await {
            warn!("Failed to persist recipe details: {}", e);
        }
    }

    /// Save the recipe if unsaved, unsave it otherwise
    ///
    /// Check-then-act against the directory without a transaction.
    pub async fn toggle_save(
        &self,
        directory: &dyn Directory,
        api: &dyn RecipeApi,
        user_id: Option<&str>,
        recipe_id: i64,
    ) -> Result<SaveOutcome> {
        let user_id =
            user_id.ok_or_else(|| Error::SessionRequired(MSG_LOGIN_TO_SAVE.to_string()))?;

        let (cached, known) = {
            let state = self.state.read().await;
            (
                state.details.get(&recipe_id).cloned(),
                state.summaries.iter().any(|r| r.id == recipe_id),
            )
        };

        let detail = match (cached, known) {
            (Some(detail), _) => detail,
            (None, true) => self.fetch_detail(api, recipe_id).await?,
            (None, false) => {
                return Err(Error::NotFound(format!("Recipe data missing: {}", recipe_id)))
            }
        };

        if directory.saved_recipe(user_id, recipe_id).await?.is_some() {
            directory.delete_saved_recipe(user_id, recipe_id).await?;
            self.state.write().await.saved_ids.remove(&recipe_id);
            info!(user_id = %user_id, recipe_id, "Recipe removed from saved list");
            Ok(SaveOutcome::Unsaved)
        } else {
            let saved = SavedRecipe::from_detail(&detail, chrono::Utc::now());
            directory.put_saved_recipe(user_id, &saved).await?;
            self.state.write().await.saved_ids.insert(recipe_id);
            info!(user_id = %user_id, recipe_id, "Recipe saved");
            Ok(SaveOutcome::Saved)
        }
    }

    /// Replace the saved-id set from the directory; failures leave it empty
    pub async fn load_saved_ids(&self, directory: &dyn Directory, user_id: &str) {
        let ids = match directory.saved_recipe_ids(user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(user_id = %user_id, "Error fetching saved recipe IDs: {}", e);
                HashSet::new()
            }
        };
        self.state.write().await.saved_ids = ids;
    }

    /// Mark a recipe unsaved after it was removed elsewhere
    pub async fn forget_saved(&self, recipe_id: i64) {
        self.state.write().await.saved_ids.remove(&recipe_id);
    }

    /// Sign-out: drop everything derived from the session, both store keys included
    pub async fn reset(&self) {
        *self.state.write().await = BookState::default();
        let _flush = self.flush.lock().await;
        if let Err(e) = self.cache.clear().await {
            warn!("Failed to clear local recipe store: {}", e);
        }
    }
}
