//! Donation page, nearby search fragment and place details fragment

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use lwmt_common::models::LatLng;
use serde::Deserialize;

use super::error::ApiError;
use super::pages::{render, AuthQuery};
use crate::client::ClientState;
use crate::views::donate::{render_donate, render_nearby, render_place_details};
use crate::views::Page;
use crate::AppState;

/// Browser position; absent when geolocation failed or is unsupported
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl NearbyQuery {
    /// Both coordinates present and in range
    pub fn position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
            {
                Some(LatLng { lat, lng })
            }
            _ => None,
        }
    }
}

/// GET /donate
pub async fn donate(
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<AuthQuery>,
) -> Html<String> {
    render(&client, Page::Donate, "/donate", query.auth.as_deref(), "Donate", &render_donate()).await
}

/// GET /donate/nearby
pub async fn nearby(State(state): State<AppState>, Query(query): Query<NearbyQuery>) -> Html<String> {
    let results = state
        .nearby
        .search(state.places_api.as_ref(), query.position())
        .await;
    Html(render_nearby(&results))
}

/// GET /donate/places/:place_id
pub async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let details = state.places_api.place_details(&place_id).await?;
    Ok(Html(render_place_details(&details)))
}

pub fn donate_routes() -> Router<AppState> {
    Router::new()
        .route("/donate", get(donate))
        .route("/donate/nearby", get(nearby))
        .route("/donate/places/:place_id", get(place_details))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_requires_both_coordinates() {
        let full = NearbyQuery {
            lat: Some(44.9),
            lng: Some(-93.2),
        };
        assert_eq!(full.position(), Some(LatLng { lat: 44.9, lng: -93.2 }));

        let half = NearbyQuery {
            lat: Some(44.9),
            lng: None,
        };
        assert_eq!(half.position(), None);

        let bogus = NearbyQuery {
            lat: Some(f64::NAN),
            lng: Some(0.0),
        };
        assert_eq!(bogus.position(), None);
    }
}
