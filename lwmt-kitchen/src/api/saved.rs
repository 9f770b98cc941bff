//! Saved recipes page and unsave

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Router,
};
use lwmt_common::models::SavedRecipe;
use tracing::{info, warn};

use super::error::user_message;
use super::pages::{render, AuthQuery};
use crate::client::ClientState;
use crate::recipes::MSG_UNSAVED;
use crate::views::saved::{render_saved_detail, render_saved_list, SavedListView};
use crate::views::Page;
use crate::AppState;

async fn saved_list(state: &AppState, user_id: Option<&str>) -> SavedListView {
    let Some(user_id) = user_id else {
        return SavedListView::SignedOut;
    };
    match state.directory.saved_recipes(user_id).await {
        Ok(recipes) => SavedListView::Recipes(recipes),
        Err(e) => {
            warn!(user_id = %user_id, "Error fetching saved recipes: {}", e);
            SavedListView::Failed(user_message(&e))
        }
    }
}

/// GET /saved
pub async fn saved(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<AuthQuery>,
) -> Html<String> {
    let user_id = client.user_id().await;
    let body = render_saved_list(&saved_list(&state, user_id.as_deref()).await);
    render(&client, Page::Saved, "/saved", query.auth.as_deref(), "Saved Recipes", &body).await
}

/// GET /saved/:id
///
/// Shows the stored copy; no recipe API call is made.
pub async fn saved_detail(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(recipe_id): Path<i64>,
    Query(query): Query<AuthQuery>,
) -> Html<String> {
    let user_id = client.user_id().await;
    let list = saved_list(&state, user_id.as_deref()).await;

    let mut body = render_saved_list(&list);
    if let Some(user_id) = user_id.as_deref() {
        let recipe: Option<SavedRecipe> = match state.directory.saved_recipe(user_id, recipe_id).await {
            Ok(recipe) => recipe,
            Err(e) => {
                warn!(recipe_id, "Error fetching saved recipe: {}", e);
                None
            }
        };
        body.push_str(&render_saved_detail(recipe.as_ref()));
    }

    let return_to = format!("/saved/{}", recipe_id);
    render(&client, Page::Saved, &return_to, query.auth.as_deref(), "Saved Recipes", &body).await
}

/// POST /saved/:id/unsave
pub async fn unsave(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(recipe_id): Path<i64>,
) -> Redirect {
    let Some(user_id) = client.user_id().await else {
        return Redirect::to("/saved");
    };

    match state.directory.delete_saved_recipe(&user_id, recipe_id).await {
        Ok(()) => {
            client.recipes().forget_saved(recipe_id).await;
            info!(user_id = %user_id, recipe_id, "Recipe unsaved");
            client.push_notice(MSG_UNSAVED).await;
        }
        Err(e) => {
            warn!(recipe_id, "Error unsaving recipe: {}", e);
            client.push_notice(user_message(&e)).await;
        }
    }
    Redirect::to("/saved")
}

pub fn saved_routes() -> Router<AppState> {
    Router::new()
        .route("/saved", get(saved))
        .route("/saved/:id", get(saved_detail))
        .route("/saved/:id/unsave", post(unsave))
}
