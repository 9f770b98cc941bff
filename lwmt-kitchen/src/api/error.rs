//! Handler-level errors
//!
//! Fragment endpoints answer failures with an inline message and a status
//! code; page handlers turn failures into a notice and redirect instead.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use lwmt_common::Error;
use thiserror::Error as ThisError;
use tracing::warn;

use crate::views::message;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Upstream API failed
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Html(message(&self.to_string(), true))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        warn!("Request failed: {}", e);
        let text = user_message(&e);
        match e {
            Error::InvalidInput(_) => ApiError::BadRequest(text),
            Error::SessionRequired(_) | Error::Auth(_) => ApiError::Unauthorized(text),
            Error::NotFound(_) => ApiError::NotFound(text),
            Error::Api(_) => ApiError::BadGateway(text),
            _ => ApiError::Internal(text),
        }
    }
}

/// Text shown to the user for an error
///
/// Input, session and auth errors carry a ready-made sentence; everything
/// else is shown with its category prefix.
pub fn user_message(e: &Error) -> String {
    match e {
        Error::InvalidInput(msg) | Error::SessionRequired(msg) | Error::Auth(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Notice text in the `Error: <message>` form
pub fn error_notice(e: &Error) -> String {
    format!("Error: {}", user_message(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_strips_prefix_for_input_errors() {
        let e = Error::InvalidInput("Please fill in all fields.".to_string());
        assert_eq!(user_message(&e), "Please fill in all fields.");
        assert_eq!(
            error_notice(&Error::Auth("Invalid email or password".to_string())),
            "Error: Invalid email or password"
        );
        assert_eq!(user_message(&Error::Api("timeout".to_string())), "API error: timeout");
    }

    #[test]
    fn test_status_mapping() {
        let response = ApiError::from(Error::NotFound("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = ApiError::from(Error::Api("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
