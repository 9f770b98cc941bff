//! Server-Sent Events for pantry changes

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    response::sse::{Event, Sse},
    routing::get,
    Extension, Router,
};
use futures::stream::Stream;

use crate::client::ClientState;
use crate::AppState;

/// GET /api/events
///
/// Streams `PantryChanged` whenever the browser's pantry mirror is replaced.
/// Signed out, the stream only carries the connection status and heartbeats.
pub async fn event_stream(
    Extension(client): Extension<Arc<ClientState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    lwmt_common::sse::create_watch_sse_stream(
        "lwmt-kitchen",
        "PantryChanged",
        client.pantry_watch().await,
    )
}

pub fn sse_routes() -> Router<AppState> {
    Router::new().route("/api/events", get(event_stream))
}
