//! Sign-in, sign-up and sign-out form posts

use std::sync::Arc;

use axum::{
    extract::State,
    response::Redirect,
    routing::post,
    Extension, Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::error_notice;
use super::pages::{back_to, safe_return};
use crate::client::ClientState;
use crate::session::AuthMode;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub return_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub return_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignOutForm {
    pub return_to: Option<String>,
}

/// Back to the form that failed, modal reopened
fn reopen_modal(return_to: Option<&str>, mode: AuthMode) -> Redirect {
    let target = safe_return(return_to);
    let path = target.split('?').next().unwrap_or("/");
    Redirect::to(&format!("{}?auth={}", path, mode.as_param()))
}

/// POST /auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<SignInForm>,
) -> Redirect {
    match state.directory.sign_in(&form.email, &form.password).await {
        Ok(account) => {
            client.sign_in(state.directory.clone(), account).await;
            back_to(form.return_to.as_deref())
        }
        Err(e) => {
            warn!(client = %client.id(), "Sign-in rejected: {}", e);
            client.push_notice(error_notice(&e)).await;
            reopen_modal(form.return_to.as_deref(), AuthMode::SignIn)
        }
    }
}

/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<SignUpForm>,
) -> Redirect {
    let result = state
        .directory
        .sign_up(&form.email, &form.password, &form.full_name)
        .await;

    match result {
        Ok(account) => {
            info!(client = %client.id(), user_id = %account.user_id, "Account created");
            client.sign_in(state.directory.clone(), account).await;
            back_to(form.return_to.as_deref())
        }
        Err(e) => {
            warn!(client = %client.id(), "Sign-up rejected: {}", e);
            client.push_notice(error_notice(&e)).await;
            reopen_modal(form.return_to.as_deref(), AuthMode::SignUp)
        }
    }
}

/// POST /auth/signout
pub async fn sign_out(
    Extension(client): Extension<Arc<ClientState>>,
    Form(form): Form<SignOutForm>,
) -> Redirect {
    client.sign_out().await;
    back_to(form.return_to.as_deref())
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signin", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signout", post(sign_out))
}
