//! Pantry page, list fragment and pantry form posts

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use chrono::Utc;
use lwmt_common::models::{LocationFilter, PantryItem};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::user_message;
use super::pages::render;
use crate::client::ClientState;
use crate::pantry::actions::{self, MSG_SIGN_IN_TO_VIEW};
use crate::pantry::{ConsumeOutcome, PantryForm};
use crate::views::kitchen::{render_kitchen, render_pantry_list, PantryListView};
use crate::views::Page;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct KitchenQuery {
    pub place: Option<String>,
    pub auth: Option<String>,
}

/// Apply a `?place=` tab selection, ignoring unknown values
async fn select_filter(client: &ClientState, place: Option<&str>) -> LocationFilter {
    if let Some(filter) = place.and_then(|p| p.parse::<LocationFilter>().ok()) {
        client.set_place_filter(filter).await;
    }
    client.place_filter().await
}

async fn list_view(client: &ClientState, filter: LocationFilter) -> PantryListView {
    match client.pantry().await {
        None => PantryListView::SignedOut,
        Some(mirror) => match mirror.filtered(filter) {
            None => PantryListView::Loading,
            Some(items) => PantryListView::Items {
                items,
                now: Utc::now(),
            },
        },
    }
}

async fn kitchen_page(client: &ClientState, auth: Option<&str>, edit: Option<&PantryItem>) -> Html<String> {
    let filter = client.place_filter().await;
    let list = list_view(client, filter).await;
    let return_to = format!("/kitchen?place={}", filter.as_str());
    render(
        client,
        Page::Kitchen,
        &return_to,
        auth,
        "My Kitchen",
        &render_kitchen(filter, &list, edit),
    )
    .await
}

fn to_kitchen() -> Redirect {
    Redirect::to("/kitchen")
}

/// GET /kitchen
pub async fn kitchen(
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<KitchenQuery>,
) -> Html<String> {
    select_filter(&client, query.place.as_deref()).await;
    kitchen_page(&client, query.auth.as_deref(), None).await
}

/// GET /kitchen/list
///
/// Re-fetched by the page on every `PantryChanged` event.
pub async fn pantry_list(
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<KitchenQuery>,
) -> Html<String> {
    let filter = select_filter(&client, query.place.as_deref()).await;
    Html(render_pantry_list(&list_view(&client, filter).await))
}

/// POST /kitchen/items
pub async fn add_item(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<PantryForm>,
) -> Redirect {
    let user_id = client.user_id().await;
    match actions::add_item(state.directory.as_ref(), user_id.as_deref(), &form).await {
        Ok(item_id) => debug!(item_id = %item_id, "Pantry item added"),
        Err(e) => {
            warn!(client = %client.id(), "Error adding item: {}", e);
            client.push_notice(user_message(&e)).await;
        }
    }
    to_kitchen()
}

/// POST /kitchen/items/:id/consume
pub async fn consume_item(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(item_id): Path<String>,
) -> Redirect {
    let Some(mirror) = client.pantry().await else {
        client.push_notice(MSG_SIGN_IN_TO_VIEW).await;
        return to_kitchen();
    };
    let Some(item) = mirror.item(&item_id) else {
        debug!(item_id = %item_id, "Consume of an item not in the mirror");
        return to_kitchen();
    };

    match actions::consume_item(state.directory.clone(), mirror.user_id(), &item).await {
        Ok(ConsumeOutcome::Decremented(remaining)) => {
            debug!(item_id = %item_id, remaining, "Pantry item eaten");
        }
        // Deletion completes in the background
        Ok(ConsumeOutcome::Removing(_)) => {}
        Err(e) => {
            warn!(item_id = %item_id, "Error eating item: {}", e);
            client.push_notice(user_message(&e)).await;
        }
    }
    to_kitchen()
}

/// GET /kitchen/items/:id/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(item_id): Path<String>,
) -> Response {
    let user_id = client.user_id().await;
    match actions::load_for_edit(state.directory.as_ref(), user_id.as_deref(), &item_id).await {
        Ok(item) => kitchen_page(&client, None, Some(&item)).await.into_response(),
        Err(e) => {
            warn!(item_id = %item_id, "Error fetching item for edit: {}", e);
            client.push_notice(user_message(&e)).await;
            to_kitchen().into_response()
        }
    }
}

/// POST /kitchen/items/:id
pub async fn edit_item(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(item_id): Path<String>,
    Form(form): Form<PantryForm>,
) -> Redirect {
    let user_id = client.user_id().await;
    if let Err(e) =
        actions::edit_item(state.directory.as_ref(), user_id.as_deref(), &item_id, &form).await
    {
        warn!(item_id = %item_id, "Error updating item: {}", e);
        client.push_notice(user_message(&e)).await;
        // Only document ids go back into a Location header
        return match Uuid::parse_str(&item_id) {
            Ok(id) => Redirect::to(&format!("/kitchen/items/{}/edit", id)),
            Err(_) => to_kitchen(),
        };
    }
    to_kitchen()
}

/// POST /kitchen/items/:id/delete
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Path(item_id): Path<String>,
) -> Redirect {
    let user_id = client.user_id().await;
    if let Err(e) = actions::remove_item(state.directory.as_ref(), user_id.as_deref(), &item_id).await {
        warn!(item_id = %item_id, "Error removing item: {}", e);
        client.push_notice(user_message(&e)).await;
    }
    to_kitchen()
}

pub fn kitchen_routes() -> Router<AppState> {
    Router::new()
        .route("/kitchen", get(kitchen))
        .route("/kitchen/list", get(pantry_list))
        .route("/kitchen/items", post(add_item))
        .route("/kitchen/items/:id", post(edit_item))
        .route("/kitchen/items/:id/edit", get(edit_form))
        .route("/kitchen/items/:id/consume", post(consume_item))
        .route("/kitchen/items/:id/delete", post(delete_item))
}
