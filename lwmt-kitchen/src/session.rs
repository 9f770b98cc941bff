//! Signed-in session and the navigation state derived from it

use lwmt_common::models::Account;
use tracing::warn;

use crate::directory::Directory;

/// Which form the auth modal shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Sign Up",
        }
    }

    pub fn other(&self) -> AuthMode {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "signin",
            AuthMode::SignUp => "signup",
        }
    }

    pub fn from_param(value: &str) -> Option<AuthMode> {
        match value {
            "signin" => Some(AuthMode::SignIn),
            "signup" => Some(AuthMode::SignUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account: Account,
    pub display_name: String,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.account.user_id
    }
}

/// Profile name if there is one, the account email otherwise
///
/// A failed lookup is logged and falls back to the email; it never blocks
/// sign-in.
pub async fn resolve_display_name(directory: &dyn Directory, account: &Account) -> String {
    match directory.profile(&account.user_id).await {
        Ok(Some(profile)) if !profile.full_name.trim().is_empty() => profile.full_name,
        Ok(_) => account.email.clone(),
        Err(e) => {
            warn!(user_id = %account.user_id, "Profile lookup failed: {}", e);
            account.email.clone()
        }
    }
}

/// Navigation view model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    /// Profile name when signed in
    pub display_name: Option<String>,
    /// Label of the signed-out call-to-action
    pub cta_label: &'static str,
    /// Pantry and chat links are usable
    pub links_enabled: bool,
}

impl NavState {
    pub fn new(session: Option<&Session>, auth_mode: AuthMode) -> Self {
        match session {
            Some(session) => NavState {
                display_name: Some(session.display_name.clone()),
                cta_label: auth_mode.title(),
                links_enabled: true,
            },
            None => NavState {
                display_name: None,
                cta_label: auth_mode.title(),
                links_enabled: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SqliteDirectory;

    #[tokio::test]
    async fn test_display_name_prefers_profile() {
        let directory = SqliteDirectory::in_memory().await.unwrap();
        let account = directory.sign_up("n@example.com", "secret99", "Nico Name").await.unwrap();
        assert_eq!(resolve_display_name(&directory, &account).await, "Nico Name");
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_email() {
        let directory = SqliteDirectory::in_memory().await.unwrap();
        let stranger = Account {
            user_id: "no-profile".to_string(),
            email: "x@example.com".to_string(),
        };
        assert_eq!(resolve_display_name(&directory, &stranger).await, "x@example.com");
    }

    #[test]
    fn test_nav_state_gates_links() {
        let signed_out = NavState::new(None, AuthMode::SignUp);
        assert!(!signed_out.links_enabled);
        assert_eq!(signed_out.cta_label, "Sign Up");

        let session = Session {
            account: Account {
                user_id: "u".to_string(),
                email: "e@example.com".to_string(),
            },
            display_name: "E".to_string(),
        };
        let signed_in = NavState::new(Some(&session), AuthMode::SignIn);
        assert!(signed_in.links_enabled);
        assert_eq!(signed_in.display_name.as_deref(), Some("E"));
    }

    #[test]
    fn test_auth_mode_params() {
        assert_eq!(AuthMode::from_param("signup"), Some(AuthMode::SignUp));
        assert_eq!(AuthMode::from_param("nope"), None);
        assert_eq!(AuthMode::SignIn.other().as_param(), "signup");
    }
}
