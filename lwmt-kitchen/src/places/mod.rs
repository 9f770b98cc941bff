//! Nearby donation sites
//!
//! Two keyword searches (food banks, shelters) around one centre, issued
//! concurrently. A failed category yields an empty list for that category;
//! results without a location are dropped. No pagination and no
//! de-duplication across categories.

mod google;

use async_trait::async_trait;
use lwmt_common::config::PlacesConfig;
use lwmt_common::models::{LatLng, PlaceCategory, PlaceDetails, PlaceSummary};
use lwmt_common::Result;
use tracing::{info, warn};

pub use google::GooglePlacesClient;

pub const MSG_LOCATION_FALLBACK: &str = "Could not find your location. Showing a default area.";

#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn nearby_search(
        &self,
        center: LatLng,
        radius_m: u32,
        category: PlaceCategory,
    ) -> Result<Vec<PlaceSummary>>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;
}

/// Places found for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResults {
    pub category: PlaceCategory,
    pub places: Vec<PlaceSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyResults {
    pub center: LatLng,
    /// The browser gave no coordinate; `center` is the default area
    pub used_fallback: bool,
    pub categories: Vec<CategoryResults>,
}

impl NearbyResults {
    /// Every place, categories in search order
    pub fn places(&self) -> impl Iterator<Item = &PlaceSummary> {
        self.categories.iter().flat_map(|c| c.places.iter())
    }
}

pub struct NearbySearch {
    radius_m: u32,
    default_center: LatLng,
}

impl NearbySearch {
    pub fn new(radius_m: u32, default_center: LatLng) -> Self {
        Self {
            radius_m,
            default_center,
        }
    }

    pub fn from_config(config: &PlacesConfig) -> Self {
        Self::new(
            config.radius_m,
            LatLng {
                lat: config.default_latitude,
                lng: config.default_longitude,
            },
        )
    }

    /// Search around `position`, or the default centre when there is none
    pub async fn search(&self, api: &dyn PlacesApi, position: Option<LatLng>) -> NearbyResults {
        let used_fallback = position.is_none();
        let center = position.unwrap_or(self.default_center);
        if used_fallback {
            info!(lat = center.lat, lng = center.lng, "No location given, using default area");
        }

        let [first, second] = PlaceCategory::ALL;
        let (a, b) = tokio::join!(
            self.search_category(api, center, first),
            self.search_category(api, center, second),
        );

        NearbyResults {
            center,
            used_fallback,
            categories: vec![a, b],
        }
    }

    async fn search_category(
        &self,
        api: &dyn PlacesApi,
        center: LatLng,
        category: PlaceCategory,
    ) -> CategoryResults {
        let places = match api.nearby_search(center, self.radius_m, category).await {
            Ok(places) => places
                .into_iter()
                .filter(|place| place.location.is_some())
                .collect(),
            Err(e) => {
                warn!(keyword = category.keyword(), "Nearby search failed: {}", e);
                Vec::new()
            }
        };
        CategoryResults { category, places }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwmt_common::config::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
    use lwmt_common::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakePlaces {
        calls: Mutex<Vec<(LatLng, u32, PlaceCategory)>>,
        fail_shelters: bool,
    }

    fn place(id: &str, located: bool) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_string(),
            name: id.to_string(),
            vicinity: "somewhere".to_string(),
            location: located.then_some(LatLng { lat: 1.0, lng: 2.0 }),
        }
    }

    #[async_trait]
    impl PlacesApi for FakePlaces {
        async fn nearby_search(
            &self,
            center: LatLng,
            radius_m: u32,
            category: PlaceCategory,
        ) -> Result<Vec<PlaceSummary>> {
            self.calls.lock().unwrap().push((center, radius_m, category));
            match category {
                PlaceCategory::FoodBank => Ok(vec![place("bank", true), place("ghost", false)]),
                PlaceCategory::Shelter if self.fail_shelters => {
                    Err(Error::Api("OVER_QUERY_LIMIT".to_string()))
                }
                PlaceCategory::Shelter => Ok(vec![place("shelter", true)]),
            }
        }

        async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
            Ok(PlaceDetails {
                name: place_id.to_string(),
                ..Default::default()
            })
        }
    }

    fn search() -> NearbySearch {
        NearbySearch::new(
            10_000,
            LatLng {
                lat: DEFAULT_LATITUDE,
                lng: DEFAULT_LONGITUDE,
            },
        )
    }

    #[tokio::test]
    async fn test_missing_location_uses_default_and_searches_both_categories() {
        let api = FakePlaces::default();
        let results = search().search(&api, None).await;

        assert!(results.used_fallback);
        assert_eq!(results.center.lat, 39.8283);
        assert_eq!(results.center.lng, -98.5795);

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(center, radius, _)| *center == results.center && *radius == 10_000));
        assert!(calls.iter().any(|(_, _, c)| *c == PlaceCategory::FoodBank));
        assert!(calls.iter().any(|(_, _, c)| *c == PlaceCategory::Shelter));
    }

    #[tokio::test]
    async fn test_results_without_location_are_skipped() {
        let api = FakePlaces::default();
        let here = LatLng { lat: 45.0, lng: -93.0 };
        let results = search().search(&api, Some(here)).await;

        assert!(!results.used_fallback);
        let ids: Vec<&str> = results.places().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["bank", "shelter"]);
    }

    #[tokio::test]
    async fn test_failed_category_yields_empty_list() {
        let api = FakePlaces {
            fail_shelters: true,
            ..Default::default()
        };
        let results = search().search(&api, None).await;

        assert_eq!(results.categories[0].places.len(), 1);
        assert_eq!(results.categories[1].category, PlaceCategory::Shelter);
        assert!(results.categories[1].places.is_empty());
    }
}
