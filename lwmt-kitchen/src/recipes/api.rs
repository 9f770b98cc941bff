//! Recipe search API client (Spoonacular)
//!
//! Thin wrapper: one request per call, request timeout, no retry.

use std::time::Duration;

use async_trait::async_trait;
use lwmt_common::models::{RecipeDetail, RecipeSummary};
use lwmt_common::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";
const USER_AGENT: &str = concat!("lwmt-kitchen/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Recipes using the given ingredients, at most `limit` results
    async fn find_by_ingredients(&self, ingredients: &[String], limit: u32)
        -> Result<Vec<RecipeSummary>>;

    async fn recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail>;
}

pub struct SpoonacularClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SpoonacularClient {
    /// A client without a key builds fine; every request then fails
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(SPOONACULAR_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
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
            .ok_or_else(|| Error::Api("Spoonacular API key not configured".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Api(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("API call failed with status: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Api(format!("Unexpected response body: {}", e)))
    }
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    async fn find_by_ingredients(
        &self,
        ingredients: &[String],
        limit: u32,
    ) -> Result<Vec<RecipeSummary>> {
        let key = self.key()?;
        let url = format!("{}/recipes/findByIngredients", self.base_url);
        let joined = ingredients.join(",");
        let number = limit.to_string();

        debug!(ingredients = %joined, limit, "Querying recipe search");
        self.get_json(
            &url,
            &[
                ("apiKey", key),
                ("ingredients", joined.as_str()),
                ("number", number.as_str()),
            ],
        )
        .await
    }

    async fn recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail> {
        let key = self.key()?;
        let url = format!("{}/recipes/{}/information", self.base_url, recipe_id);

        debug!(recipe_id, "Querying recipe information");
        self.get_json(&url, &[("apiKey", key), ("includeNutrition", "false")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = SpoonacularClient::with_base_url("http://127.0.0.1:9", None).unwrap();
        let err = client
            .find_by_ingredients(&["egg".to_string()], 9)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(client.recipe_information(1).await.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SpoonacularClient::with_base_url("http://localhost:1234/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
