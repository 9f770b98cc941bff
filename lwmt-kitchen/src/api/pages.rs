//! Page assembly shared by every page handler

use std::sync::Arc;

use axum::{
    extract::Query,
    http::HeaderValue,
    response::{Html, Redirect},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use crate::client::ClientState;
use crate::session::{AuthMode, NavState};
use crate::views::{self, Chrome, Page};
use crate::AppState;

/// `?auth=signin|signup` opens the auth modal on any page
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub auth: Option<String>,
}

/// Local path to send the browser back to; anything else becomes `/`
pub fn safe_return(return_to: Option<&str>) -> String {
    match return_to {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => "/".to_string(),
    }
}

/// Same-origin path that is also a valid `Location` header value
///
/// Browsers read `/\host` as `//host`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control)
        && HeaderValue::from_str(path).is_ok()
}

/// 303 back to `return_to`
pub fn back_to(return_to: Option<&str>) -> Redirect {
    Redirect::to(&safe_return(return_to))
}

/// Wrap a page body in the shared header, notice and auth modal
pub async fn render(
    client: &ClientState,
    page: Page,
    return_to: &str,
    auth: Option<&str>,
    title: &str,
    body: &str,
) -> Html<String> {
    let requested = auth.and_then(AuthMode::from_param);
    if let Some(mode) = requested {
        client.set_auth_mode(mode).await;
    }

    let session = client.session().await;
    let auth_mode = client.auth_mode().await;
    let chrome = Chrome {
        page,
        nav: NavState::new(session.as_ref(), auth_mode),
        auth_mode,
        modal_open: requested.is_some() && session.is_none(),
        notice: client.take_notice().await,
        return_to: return_to.to_string(),
    };

    Html(views::render_page(&chrome, title, body))
}

/// GET /
pub async fn home_page(
    Extension(client): Extension<Arc<ClientState>>,
    Query(query): Query<AuthQuery>,
) -> Html<String> {
    render(
        &client,
        Page::Home,
        "/",
        query.auth.as_deref(),
        "Home",
        &views::render_home(),
    )
    .await
}

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(home_page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_rejects_foreign_targets() {
        assert_eq!(safe_return(Some("/kitchen?place=Fridge")), "/kitchen?place=Fridge");
        assert_eq!(safe_return(Some("//evil.example")), "/");
        assert_eq!(safe_return(Some("https://evil.example")), "/");
        assert_eq!(safe_return(Some("/\\evil.example")), "/");
        assert_eq!(safe_return(None), "/");
    }

    #[test]
    fn test_safe_return_rejects_unsendable_targets() {
        assert_eq!(safe_return(Some("/kitchen\n")), "/");
        assert_eq!(safe_return(Some("/kitchen\r\nSet-Cookie: x=1")), "/");
        assert_eq!(safe_return(Some("/kit\tchen")), "/");
        assert_eq!(safe_return(Some("/kitchen\u{7f}")), "/");
        assert_eq!(safe_return(Some("/recipes/1\\2")), "/recipes/1\\2");

        // Whatever survives must be sendable
        let response = axum::response::IntoResponse::into_response(back_to(Some("/saved\n")));
        assert_eq!(response.headers()[axum::http::header::LOCATION], "/");
    }
}
