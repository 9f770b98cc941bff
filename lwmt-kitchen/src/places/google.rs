//! Google Places web service client

use std::time::Duration;

use async_trait::async_trait;
use lwmt_common::models::{LatLng, PlaceCategory, PlaceDetails, PlaceSummary};
use lwmt_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::PlacesApi;

const PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DETAIL_FIELDS: &str = "name,formatted_address,formatted_phone_number,website";

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    place_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    vicinity: String,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
    error_message: Option<String>,
}

impl From<NearbyResult> for PlaceSummary {
    fn from(result: NearbyResult) -> Self {
        PlaceSummary {
            place_id: result.place_id,
            name: result.name,
            vicinity: result.vicinity,
            location: result.geometry.and_then(|g| g.location),
        }
    }
}

/// Maps an API status other than OK to an error; `ZERO_RESULTS` is success
fn check_status(status: &str, error_message: Option<String>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(Error::Api(match error_message {
            Some(message) => format!("Places status {}: {}", other, message),
            None => format!("Places status {}", other),
        })),
    }
}

pub struct GooglePlacesClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(PLACES_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Api(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Api("Google Maps API key not configured".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Api(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("Places request failed with status: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Api(format!("Unexpected response body: {}", e)))
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn nearby_search(
        &self,
        center: LatLng,
        radius_m: u32,
        category: PlaceCategory,
    ) -> Result<Vec<PlaceSummary>> {
        let key = self.key()?;
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();

        debug!(location = %location, keyword = category.keyword(), "Nearby search");
        let response: NearbyResponse = self
            .get_json(
                "nearbysearch/json",
                &[
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                    ("type", "establishment"),
                    ("keyword", category.keyword()),
                    ("key", key),
                ],
            )
            .await?;
        check_status(&response.status, response.error_message)?;

        Ok(response.results.into_iter().map(PlaceSummary::from).collect())
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let key = self.key()?;
        let response: DetailsResponse = self
            .get_json(
                "details/json",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS), ("key", key)],
            )
            .await?;
        check_status(&response.status, response.error_message)?;

        response
            .result
            .ok_or_else(|| Error::NotFound(format!("Place {}", place_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_payload_keeps_missing_geometry_as_none() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"place_id": "a", "name": "Food Bank", "vicinity": "1 Main St",
                 "geometry": {"location": {"lat": 40.1, "lng": -99.2}}},
                {"place_id": "b", "name": "Shelter", "vicinity": "2 Oak Ave"}
            ]
        }"#;
        let response: NearbyResponse = serde_json::from_str(json).unwrap();
        let places: Vec<PlaceSummary> = response.results.into_iter().map(PlaceSummary::from).collect();
        assert_eq!(places[0].location, Some(LatLng { lat: 40.1, lng: -99.2 }));
        assert_eq!(places[1].location, None);
    }

    #[test]
    fn test_status_check() {
        assert!(check_status("OK", None).is_ok());
        assert!(check_status("ZERO_RESULTS", None).is_ok());
        let err = check_status("REQUEST_DENIED", Some("bad key".to_string())).unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_details_payload() {
        let json = r#"{
            "status": "OK",
            "result": {"name": "Food Bank", "formatted_address": "1 Main St, Town",
                       "formatted_phone_number": "(555) 010-0000"}
        }"#;
        let response: DetailsResponse = serde_json::from_str(json).unwrap();
        let details = response.result.unwrap();
        assert_eq!(details.formatted_phone_number.as_deref(), Some("(555) 010-0000"));
        assert_eq!(details.website, None);
    }
}
