//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Heartbeat interval for every stream
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream that fires `event_name` whenever `rx` changes
///
/// The first message is always a `ConnectionStatus: connected` event so the
/// page can show its connection state. The stream ends when the sender side
/// of the watch channel is dropped (sign-out, client eviction).
///
/// # Example
/// ```rust,ignore
/// pub async fn event_stream(client: ClientHandle) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     lwmt_common::sse::create_watch_sse_stream("lwmt-kitchen", "PantryChanged", client.pantry_watch())
/// }
/// ```
pub fn create_watch_sse_stream<T>(
    service_name: &'static str,
    event_name: &'static str,
    mut rx: watch::Receiver<T>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Send + Sync + 'static,
{
    info!("New SSE client connected to {} {} events", service_name, event_name);

    let stream = async_stream::stream! {
        // Only changes after the connected event are announced
        rx.borrow_and_update();

        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        while rx.changed().await.is_ok() {
            debug!("SSE: {} {}", service_name, event_name);
            yield Ok(Event::default().event(event_name).data("changed"));
        }

        debug!("SSE: {} {} stream closed", service_name, event_name);
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
