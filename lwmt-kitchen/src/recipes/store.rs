//! Per-browser persistent key-value store and the recipe cache kept in it
//!
//! Values are opaque strings, like browser local storage. The file-backed
//! store keeps one JSON object per browser and rewrites it on every change.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lwmt_common::models::{RecipeDetail, RecipeSummary};
use lwmt_common::{Error, Result};
use tracing::{debug, warn};

/// Key holding the last successful search result
pub const FETCHED_RECIPES_KEY: &str = "fetchedRecipes";

/// Key holding the recipe detail map, keyed by recipe id
pub const RECIPE_DETAILS_KEY: &str = "recipeDetailsCache";

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: String) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

fn lock_poisoned() -> Error {
    Error::Internal("Local store lock poisoned".to_string())
}

/// In-process store, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON file store, one file per browser
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `<dir>/<client_id>.json`, starting empty if it is missing or unreadable
    pub fn open(dir: &Path, client_id: &str) -> Self {
        let path = dir.join(format!("{}.json", client_id));
        let entries: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Discarding unreadable local store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened local store");

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        std::fs::write(&self.path, serde_json::to_string(entries)?)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Typed view over the two recipe keys
///
/// Writes run on the blocking pool so a file flush never stalls the runtime.
pub struct RecipeCache {
    store: Arc<dyn LocalStore>,
}

impl RecipeCache {
    pub fn new(store: Box<dyn LocalStore>) -> Self {
        Self {
            store: Arc::from(store),
        }
    }

    /// Cached summaries; a corrupt value reads as empty
    pub fn load_summaries(&self) -> Vec<RecipeSummary> {
        self.load(FETCHED_RECIPES_KEY).unwrap_or_default()
    }

    pub fn load_details(&self) -> HashMap<i64, RecipeDetail> {
        self.load(RECIPE_DETAILS_KEY).unwrap_or_default()
    }

    pub async fn store_summaries(&self, summaries: &[RecipeSummary]) -> Result<()> {
        let value = serde_json::to_string(summaries)?;
        self.write(FETCHED_RECIPES_KEY, Some(value)).await
    }

    pub async fn store_details(&self, details: &HashMap<i64, RecipeDetail>) -> Result<()> {
        let value = serde_json::to_string(details)?;
        self.write(RECIPE_DETAILS_KEY, Some(value)).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.write(FETCHED_RECIPES_KEY, None).await?;
        self.write(RECIPE_DETAILS_KEY, None).await
    }

    /// Set `key`, or remove it when `value` is `None`
    async fn write(&self, key: &'static str, value: Option<String>) -> Result<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || match value {
            Some(value) => store.set(key, value),
            None => store.remove(key),
        })
        .await
        .map_err(|e| Error::Internal(format!("Local store write task failed: {}", e)))?
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, "Local store read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Ignoring corrupt local store value: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary(id: i64) -> RecipeSummary {
        RecipeSummary {
            id,
            title: format!("Dish {}", id),
            image: String::new(),
            used_ingredients: vec![],
            missed_ingredients: vec![],
            likes: 0,
        }
    }

    fn detail(id: i64) -> RecipeDetail {
        RecipeDetail {
            id,
            title: format!("Dish {}", id),
            image: String::new(),
            instructions: Some("<p>Boil.</p>".to_string()),
            servings: Some(2),
            ready_in_minutes: Some(20),
            spoonacular_score: Some(71.4),
            aggregate_likes: Some(3),
            extended_ingredients: vec![],
        }
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), "client-a");
        store.set(FETCHED_RECIPES_KEY, "[]".to_string()).unwrap();
        assert!(store.path().exists());

        let reopened = FileStore::open(dir.path(), "client-a");
        assert_eq!(reopened.get(FETCHED_RECIPES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(FileStore::open(dir.path(), "client-b").get(FETCHED_RECIPES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_removes_file_when_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), "client-a");
        store.set("k", "v".to_string()).unwrap();
        store.remove("k").unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_recipe_cache_round_trip_and_clear() {
        let cache = RecipeCache::new(Box::new(MemoryStore::new()));
        assert!(cache.load_summaries().is_empty());

        cache.store_summaries(&[summary(1), summary(2)]).await.unwrap();
        let mut details = HashMap::new();
        details.insert(7, detail(7));
        cache.store_details(&details).await.unwrap();

        assert_eq!(cache.load_summaries().len(), 2);
        assert_eq!(cache.load_details()[&7].spoonacular_score, Some(71.4));

        cache.clear().await.unwrap();
        assert!(cache.load_summaries().is_empty());
        assert!(cache.load_details().is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(FETCHED_RECIPES_KEY, "{not json".to_string()).unwrap();
        let cache = RecipeCache::new(Box::new(store));
        assert!(cache.load_summaries().is_empty());
    }
}
