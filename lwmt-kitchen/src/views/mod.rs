//! Server-rendered HTML
//!
//! One render function per component, each taking a plain view model and
//! returning an HTML string. The header and auth modal are shared fragments
//! spliced into every page by [`render_page`].

pub mod donate;
pub mod kitchen;
pub mod recipes;
pub mod saved;

use crate::session::{AuthMode, NavState};

/// Top-level pages, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Kitchen,
    Recipes,
    Saved,
    Donate,
}

impl Page {
    pub const NAV: [Page; 5] = [Page::Home, Page::Kitchen, Page::Recipes, Page::Saved, Page::Donate];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Kitchen => "/kitchen",
            Page::Recipes => "/recipes",
            Page::Saved => "/saved",
            Page::Donate => "/donate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Kitchen => "My Kitchen",
            Page::Recipes => "Recipes",
            Page::Saved => "Saved Recipes",
            Page::Donate => "Donate",
        }
    }

    /// Only usable with a session
    fn gated(&self) -> bool {
        matches!(self, Page::Kitchen)
    }
}

/// Everything the shared fragments need
#[derive(Debug, Clone)]
pub struct Chrome {
    pub page: Page,
    pub nav: NavState,
    pub auth_mode: AuthMode,
    pub modal_open: bool,
    pub notice: Option<String>,
    /// Where auth forms send the browser afterwards
    pub return_to: String,
}

/// Escape text for element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain text of an HTML snippet: tags dropped, common entities decoded
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// First letter upper-cased
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inline status line used for empty and error states
pub fn message(text: &str, error: bool) -> String {
    let class = if error { "text-red-500" } else { "text-gray-500" };
    format!(r#"<p class="{} text-center">{}</p>"#, class, escape(text))
}

fn auth_link(return_to: &str, mode: AuthMode) -> String {
    let base = return_to.split('?').next().unwrap_or("/");
    format!("{}?auth={}", base, mode.as_param())
}

pub fn render_header(chrome: &Chrome) -> String {
    let links: String = Page::NAV
        .iter()
        .map(|page| {
            let mut classes = vec!["nav-link"];
            if *page == chrome.page {
                classes.push("nav-link-active");
            }
            if page.gated() && !chrome.nav.links_enabled {
                classes.push("disabled-link");
            }
            let id = if *page == Page::Kitchen { r#" id="pantry-link""# } else { "" };
            format!(
                r#"<a href="{}" class="{}"{}>{}</a>"#,
                page.path(),
                classes.join(" "),
                id,
                page.label()
            )
        })
        .collect();

    let chat_class = if chrome.nav.links_enabled {
        "nav-link"
    } else {
        "nav-link disabled-link"
    };

    let auth_status = match &chrome.nav.display_name {
        Some(name) => format!(
            r#"<div id="user-menu-container" class="user-menu-container">
        <button id="profile-display" class="profile-display" type="button">
            <i class="fa-solid fa-circle-user"></i> <span id="user-name">{}</span>
        </button>
        <div id="user-menu" class="user-menu hidden">
            <form method="post" action="/auth/signout">
                <input type="hidden" name="return_to" value="{}">
                <button id="signout-button" type="submit">Sign Out</button>
            </form>
        </div>
    </div>"#,
            escape(name),
            escape(&chrome.return_to)
        ),
        None => format!(
            r#"<a id="signin-button" class="profile-button" href="{}">{}</a>"#,
            escape(&auth_link(&chrome.return_to, chrome.auth_mode)),
            chrome.nav.cta_label
        ),
    };

    format!(
        r##"<header class="site-header">
    <a href="/" class="logo">Less Waste, More Taste</a>
    <nav class="nav-links">
        {links}
        <a href="#" id="chat-link" class="{chat_class}">Chat</a>
    </nav>
    <div id="auth-status">
    {auth_status}
    </div>
</header>"##
    )
}

pub fn render_auth_modal(chrome: &Chrome) -> String {
    let mode = chrome.auth_mode;
    let hidden = if chrome.modal_open { "" } else { " hidden" };
    let action = match mode {
        AuthMode::SignIn => "/auth/signin",
        AuthMode::SignUp => "/auth/signup",
    };
    let name_group = match mode {
        AuthMode::SignUp => {
            r#"<div id="name-group" class="form-group">
                <label for="fullName">Full Name</label>
                <input type="text" id="fullName" name="full_name" required>
            </div>"#
        }
        AuthMode::SignIn => "",
    };
    let switch_text = match mode {
        AuthMode::SignIn => "Don't have an account?",
        AuthMode::SignUp => "Already have an account?",
    };
    let close_href = chrome.return_to.split('?').next().unwrap_or("/");

    format!(
        r#"<div id="auth-modal" class="modal{hidden}">
    <div class="modal-content">
        <a href="{close}" class="close-modal">&times;</a>
        <h2 id="auth-modal-title">{title}</h2>
        <form id="auth-form" method="post" action="{action}">
            <input type="hidden" name="return_to" value="{return_to}">
            {name_group}
            <div class="form-group">
                <label for="email">Email</label>
                <input type="email" id="email" name="email" required>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button id="auth-submit-button" type="submit" class="auth-submit-button">{title}</button>
        </form>
        <p id="switch-form-text">{switch_text} <a href="{switch_href}" id="switch-form-link">{switch_title}</a></p>
    </div>
</div>"#,
        close = escape(close_href),
        title = mode.title(),
        return_to = escape(close_href),
        switch_href = escape(&auth_link(&chrome.return_to, mode.other())),
        switch_title = mode.other().title(),
    )
}

fn render_notice(notice: Option<&str>) -> String {
    match notice {
        Some(text) => format!(
            r#"<div id="notice" class="notice" role="alert" data-alert="{0}">{0}</div>"#,
            escape(text)
        ),
        None => String::new(),
    }
}

/// Full document: header, notice, page body, auth modal
pub fn render_page(chrome: &Chrome, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Less Waste, More Taste</title>
    <link rel="stylesheet" href="/static/app.css">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <script src="/static/app.js" defer></script>
</head>
<body data-page="{page}">
{header}
{notice}
<main class="container">
{body}
</main>
{modal}
</body>
</html>"#,
        title = escape(title),
        page = chrome.page.label(),
        header = render_header(chrome),
        notice = render_notice(chrome.notice.as_deref()),
        modal = render_auth_modal(chrome),
    )
}

/// Landing page body
pub fn render_home() -> String {
    format!(
        r#"<section class="hero">
    <h1>Less Waste, More Taste</h1>
    <p class="subtitle">Track what is in your kitchen, cook with what you have, and share what you can't use.</p>
    <a class="get-started-button" href="/?auth={signup}">Get Started Now</a>
</section>
<section class="feature-grid">
    <div class="feature-card"><h3>My Kitchen</h3><p>Keep tabs on expiry dates in the fridge, freezer and pantry.</p></div>
    <div class="feature-card"><h3>Recipes</h3><p>Find recipes that use the ingredients you already have.</p></div>
    <div class="feature-card"><h3>Donate</h3><p>Locate food banks and shelters near you.</p></div>
</section>"#,
        signup = AuthMode::SignUp.as_param()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome(page: Page, signed_in: bool) -> Chrome {
        let nav = NavState {
            display_name: signed_in.then(|| "Dana <Cook>".to_string()),
            cta_label: "Sign In",
            links_enabled: signed_in,
        };
        Chrome {
            page,
            nav,
            auth_mode: AuthMode::SignIn,
            modal_open: false,
            notice: None,
            return_to: page.path().to_string(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<ol><li>Boil&nbsp;water</li><li>Add pasta</li></ol>"), "Boil waterAdd pasta");
        assert_eq!(strip_tags("Salt &amp; pepper"), "Salt & pepper");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("garlic"), "Garlic");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_header_marks_active_page_and_gates_pantry() {
        let html = render_header(&chrome(Page::Recipes, false));
        assert!(html.contains(r#"<a href="/recipes" class="nav-link nav-link-active">Recipes</a>"#));
        assert!(html.contains(r#"class="nav-link disabled-link" id="pantry-link""#));
        assert!(html.contains(r#"id="chat-link" class="nav-link disabled-link""#));
        assert!(html.contains("signin-button"));

        let html = render_header(&chrome(Page::Kitchen, true));
        assert!(html.contains(r#"class="nav-link nav-link-active" id="pantry-link""#));
        assert!(html.contains("Dana &lt;Cook&gt;"));
        assert!(!html.contains("signin-button"));
    }

    #[test]
    fn test_auth_modal_modes() {
        let mut c = chrome(Page::Home, false);
        c.modal_open = true;
        let html = render_auth_modal(&c);
        assert!(html.contains(r#"action="/auth/signin""#));
        assert!(!html.contains("name-group"));
        assert!(html.contains(r#"class="modal""#));
        assert!(html.contains("Don't have an account?"));

        c.auth_mode = AuthMode::SignUp;
        let html = render_auth_modal(&c);
        assert!(html.contains(r#"action="/auth/signup""#));
        assert!(html.contains("name-group"));
        assert!(html.contains(r#"href="/?auth=signin""#));
    }

    #[test]
    fn test_page_contains_notice() {
        let mut c = chrome(Page::Home, false);
        c.notice = Some("Error: Invalid email or password".to_string());
        let html = render_page(&c, "Home", &render_home());
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Error: Invalid email or password"));
        assert!(html.contains(r#"id="auth-modal" class="modal hidden""#));
    }
}
