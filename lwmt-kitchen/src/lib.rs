//! lwmt-kitchen library - Less Waste, More Taste web service
//!
//! Pantry tracking with live updates, recipe search by ingredient, saved
//! recipes and nearby donation sites, served as server-rendered pages.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod client;
pub mod directory;
pub mod pantry;
pub mod places;
pub mod recipes;
pub mod session;
pub mod views;

use client::ClientRegistry;
use directory::Directory;
use places::{NearbySearch, PlacesApi};
use recipes::RecipeApi;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Accounts, profiles, pantry and saved recipes
    pub directory: Arc<dyn Directory>,
    pub recipe_api: Arc<dyn RecipeApi>,
    pub places_api: Arc<dyn PlacesApi>,
    /// Per-browser state keyed by the client cookie
    pub clients: Arc<ClientRegistry>,
    pub nearby: Arc<NearbySearch>,
    /// Recipes requested per search
    pub recipe_result_cap: u32,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn Directory>,
        recipe_api: Arc<dyn RecipeApi>,
        places_api: Arc<dyn PlacesApi>,
        clients: ClientRegistry,
        nearby: NearbySearch,
        recipe_result_cap: u32,
    ) -> Self {
        Self {
            directory,
            recipe_api,
            places_api,
            clients: Arc::new(clients),
            nearby: Arc::new(nearby),
            recipe_result_cap,
        }
    }
}

/// Build application router
///
/// Every route except health and build info sees the browser's client state.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let browser = Router::new()
        .merge(api::page_routes())
        .merge(api::auth_routes())
        .merge(api::kitchen_routes())
        .merge(api::recipe_routes())
        .merge(api::saved_routes())
        .merge(api::donate_routes())
        .merge(api::sse_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            client::client_middleware,
        ));

    let public = Router::new()
        .merge(api::static_routes())
        .merge(api::health_routes())
        .merge(api::buildinfo_routes());

    Router::new()
        .merge(browser)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
