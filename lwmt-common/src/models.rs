//! Domain models shared by the directory, the API adapters and the views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ========================================
// Pantry
// ========================================

/// Where an item is stored; also the pantry tab it appears under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageLocation {
    Fridge,
    Freezer,
    Pantry,
}

impl StorageLocation {
    pub const ALL: [StorageLocation; 3] = [
        StorageLocation::Fridge,
        StorageLocation::Freezer,
        StorageLocation::Pantry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "Fridge",
            StorageLocation::Freezer => "Freezer",
            StorageLocation::Pantry => "Pantry",
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Fridge" => Ok(StorageLocation::Fridge),
            "Freezer" => Ok(StorageLocation::Freezer),
            "Pantry" => Ok(StorageLocation::Pantry),
            other => Err(Error::InvalidInput(format!("Unknown location: {}", other))),
        }
    }
}

/// Active pantry tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Only(StorageLocation),
}

impl LocationFilter {
    pub fn matches(&self, item: &PantryItem) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Only(location) => item.place == *location,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationFilter::All => "All",
            LocationFilter::Only(location) => location.as_str(),
        }
    }
}

impl FromStr for LocationFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "All" => Ok(LocationFilter::All),
            other => other.parse().map(LocationFilter::Only),
        }
    }
}

/// A tracked food item owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub place: StorageLocation,
    pub expiry_date: DateTime<Utc>,
    pub added_at: DateTime<Utc>,
}

impl PantryItem {
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        Freshness::for_expiry(self.expiry_date, now)
    }
}

/// Fields of a new pantry document
#[derive(Debug, Clone, PartialEq)]
pub struct NewPantryItem {
    pub name: String,
    pub quantity: u32,
    pub place: StorageLocation,
    pub expiry_date: DateTime<Utc>,
}

/// Partial update of a pantry document; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PantryItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub place: Option<StorageLocation>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl PantryItemUpdate {
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}

impl From<NewPantryItem> for PantryItemUpdate {
    fn from(item: NewPantryItem) -> Self {
        Self {
            name: Some(item.name),
            quantity: Some(item.quantity),
            place: Some(item.place),
            expiry_date: Some(item.expiry_date),
        }
    }
}

/// Derived red/yellow/green classification of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Expires within 2 days (or already expired)
    Bad,
    /// Expires within a week
    Warning,
    Good,
}

impl Freshness {
    /// Classify by whole days to expiry, rounded up
    pub fn for_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::for_days(days_until(expiry, now))
    }

    pub fn for_days(days: i64) -> Self {
        if days <= 2 {
            Freshness::Bad
        } else if days <= 7 {
            Freshness::Warning
        } else {
            Freshness::Good
        }
    }

    /// CSS class of the band
    pub fn css_class(&self) -> &'static str {
        match self {
            Freshness::Bad => "status-bad",
            Freshness::Warning => "status-warning",
            Freshness::Good => "status-good",
        }
    }
}

/// `ceil((expiry - now) / 1 day)`
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

// ========================================
// Accounts
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    pub email: String,
}

/// Profile document written at sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
}

// ========================================
// Recipes
// ========================================

/// Ingredient name as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRef {
    pub name: String,
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub used_ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub missed_ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub likes: i64,
}

/// Full ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub original: String,
}

/// Recipe information endpoint payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub spoonacular_score: Option<f64>,
    #[serde(default)]
    pub aggregate_likes: Option<i64>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

/// A user-pinned copy of a recipe detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub likes: i64,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub instructions: String,
    pub extended_ingredients: Vec<ExtendedIngredient>,
    pub saved_at: DateTime<Utc>,
}

impl SavedRecipe {
    pub fn from_detail(detail: &RecipeDetail, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            image: detail.image.clone(),
            likes: detail.aggregate_likes.unwrap_or(0),
            ready_in_minutes: detail.ready_in_minutes.unwrap_or(0),
            servings: detail.servings.unwrap_or(0),
            instructions: detail.instructions.clone().unwrap_or_default(),
            extended_ingredients: detail.extended_ingredients.clone(),
            saved_at,
        }
    }
}

// ========================================
// Places
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Keyword categories searched around the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceCategory {
    FoodBank,
    Shelter,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 2] = [PlaceCategory::FoodBank, PlaceCategory::Shelter];

    /// Keyword sent to the places API
    pub fn keyword(&self) -> &'static str {
        match self {
            PlaceCategory::FoodBank => "food bank",
            PlaceCategory::Shelter => "homeless shelter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaceCategory::FoodBank => "Food banks",
            PlaceCategory::Shelter => "Shelters",
        }
    }
}

/// One nearby-search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub vicinity: String,
    pub location: Option<LatLng>,
}

/// Details-on-demand lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceDetails {
    pub name: String,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_days_until_rounds_up() {
        let now = now();
        assert_eq!(days_until(now, now), 0);
        assert_eq!(days_until(now + Duration::milliseconds(1), now), 1);
        assert_eq!(days_until(now + Duration::days(2), now), 2);
        assert_eq!(days_until(now + Duration::days(2) + Duration::hours(1), now), 3);
        assert_eq!(days_until(now - Duration::hours(36), now), -1);
    }

    #[test]
    fn test_freshness_band_boundaries() {
        let now = now();
        assert_eq!(Freshness::for_expiry(now - Duration::days(3), now), Freshness::Bad);
        assert_eq!(Freshness::for_expiry(now + Duration::days(2), now), Freshness::Bad);
        assert_eq!(
            Freshness::for_expiry(now + Duration::days(2) + Duration::minutes(1), now),
            Freshness::Warning
        );
        assert_eq!(Freshness::for_expiry(now + Duration::days(7), now), Freshness::Warning);
        assert_eq!(
            Freshness::for_expiry(now + Duration::days(7) + Duration::seconds(1), now),
            Freshness::Good
        );
        assert_eq!(Freshness::for_days(30), Freshness::Good);
    }

    #[test]
    fn test_location_filter_parse_and_match() {
        let item = PantryItem {
            id: "a".to_string(),
            name: "Milk".to_string(),
            quantity: 1,
            place: StorageLocation::Fridge,
            expiry_date: now(),
            added_at: now(),
        };

        let all: LocationFilter = "All".parse().unwrap();
        let fridge: LocationFilter = "Fridge".parse().unwrap();
        let freezer: LocationFilter = "Freezer".parse().unwrap();

        assert!(all.matches(&item));
        assert!(fridge.matches(&item));
        assert!(!freezer.matches(&item));
        assert!("Garage".parse::<LocationFilter>().is_err());
    }

    #[test]
    fn test_recipe_summary_accepts_api_shape() {
        let json = r#"{
            "id": 716429,
            "title": "Pasta with Garlic",
            "image": "https://img.example/716429.jpg",
            "usedIngredients": [{"name": "garlic", "amount": 2}],
            "missedIngredients": [{"name": "pasta"}, {"name": "scallions"}],
            "likes": 209
        }"#;
        let summary: RecipeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, 716429);
        assert_eq!(summary.used_ingredients.len(), 1);
        assert_eq!(summary.missed_ingredients[1].name, "scallions");
        assert_eq!(summary.likes, 209);
    }

    #[test]
    fn test_saved_recipe_defaults_missing_detail_fields() {
        let detail = RecipeDetail {
            id: 12345,
            title: "Soup".to_string(),
            image: String::new(),
            instructions: None,
            servings: None,
            ready_in_minutes: Some(25),
            spoonacular_score: None,
            aggregate_likes: None,
            extended_ingredients: vec![],
        };
        let saved = SavedRecipe::from_detail(&detail, now());
        assert_eq!(saved.likes, 0);
        assert_eq!(saved.servings, 0);
        assert_eq!(saved.ready_in_minutes, 25);
        assert_eq!(saved.instructions, "");
    }
}
