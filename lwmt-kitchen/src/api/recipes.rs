//! Recipe search page, detail view and save toggle

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use chrono::Utc;
use lwmt_common::models::RecipeDetail;
use lwmt_common::Error;
use serde::Deserialize;
use tracing::{info, warn};

use super::pages::{back_to, render, AuthQuery};
use crate::client::ClientState;
use crate::recipes::{
    QuickAdd, SaveOutcome, MSG_DETAIL_FAILED, MSG_LOGIN_TO_SAVE, MSG_RECIPE_DATA_MISSING,
    MSG_SAVE_DETAIL_FAILED, MSG_SAVE_FAILED, MSG_UNSAVED,
};
use crate::views::recipes::{render_cards, render_detail, render_quick_add, render_recipes};
use crate::views::Page;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IngredientForm {
    #[serde(default)]
    pub ingredient: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveForm {
    pub return_to: Option<String>,
}

/// Selection, quick-add pills and cards, plus an optional detail modal
async fn recipes_page(
    state: &AppState,
    client: &ClientState,
    auth: Option<&str>,
    detail: Option<&RecipeDetail>,
) -> Html<String> {
    let book = client.recipes();
    let user_id = client.user_id().await;
    let quick_add = QuickAdd::load(state.directory.as_ref(), user_id.as_deref()).await;

    let selection = book.selection().await;
    let summaries = book.summaries().await;
    let saved_ids = book.saved_ids().await;
    let outcome = book.take_outcome().await;

    let mut body = render_recipes(
        selection.items(),
        &render_quick_add(&quick_add, Utc::now()),
        &render_cards(&summaries, &saved_ids, outcome),
    );
    let return_to = match detail {
        Some(detail) => {
            body.push_str(&render_detail(detail, saved_ids.contains(&detail.id)));
            format!("/recipes/{}", detail.id)
        }
        None => "/recipes".to_string(),
    };

    render(client, Page::Recipes, &return_to, auth, "Recipes", &body).await
}

/// GET /recipes
pub async fn recipes(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<AuthQuery>,
) -> Html<String> {
    recipes_page(&state, &client, query.auth.as_deref(), None).await
}

/// POST /recipes/ingredients
pub async fn add_ingredient(
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<IngredientForm>,
) -> Redirect {
    client.recipes().add_ingredient(&form.ingredient).await;
    Redirect::to("/recipes")
}

/// POST /recipes/ingredients/remove
pub async fn remove_ingredient(
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<IngredientForm>,
) -> Redirect {
    client.recipes().remove_ingredient(&form.ingredient).await;
    Redirect::to("/recipes")
}

/// POST /recipes/search
///
/// The outcome is kept on the book and shown by the next page render.
pub async fn search(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
) -> Redirect {
    let outcome = client
        .recipes()
        .search(state.recipe_api.as_ref(), state.recipe_result_cap)
        .await;
    info!(client = %client.id(), ?outcome, "Recipe search finished");
    Redirect::to("/recipes")
}

/// GET /recipes/:id
pub async fn recipe_detail(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(recipe_id): Path<i64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    match client.recipes().detail(state.recipe_api.as_ref(), recipe_id).await {
        Ok(detail) => recipes_page(&state, &client, query.auth.as_deref(), Some(&detail))
            .await
            .into_response(),
        Err(e) => {
            warn!(recipe_id, "Error fetching recipe details: {}", e);
            let text = match e {
                Error::NotFound(_) => "Recipe not found",
                _ => MSG_DETAIL_FAILED,
            };
            client.push_notice(text).await;
            Redirect::to("/recipes").into_response()
        }
    }
}

/// POST /recipes/:id/save
pub async fn toggle_save(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(recipe_id): Path<i64>,
    Form(form): Form<SaveForm>,
) -> Redirect {
    let user_id = client.user_id().await;
    let result = client
        .recipes()
        .toggle_save(
            state.directory.as_ref(),
            state.recipe_api.as_ref(),
            user_id.as_deref(),
            recipe_id,
        )
        .await;

    match result {
        Ok(SaveOutcome::Saved) => {}
        Ok(SaveOutcome::Unsaved) => client.push_notice(MSG_UNSAVED).await,
        Err(e) => {
            warn!(recipe_id, "Error toggling save status: {}", e);
            let text = match e {
                Error::SessionRequired(_) => MSG_LOGIN_TO_SAVE,
                Error::NotFound(_) => MSG_RECIPE_DATA_MISSING,
                Error::Api(_) => MSG_SAVE_DETAIL_FAILED,
                _ => MSG_SAVE_FAILED,
            };
            client.push_notice(text).await;
        }
    }
    back_to(form.return_to.as_deref().or(Some("/recipes")))
}

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes))
        .route("/recipes/ingredients", post(add_ingredient))
        .route("/recipes/ingredients/remove", post(remove_ingredient))
        .route("/recipes/search", post(search))
        .route("/recipes/:id", get(recipe_detail))
        .route("/recipes/:id/save", post(toggle_save))
}
