//! HTTP handlers for lwmt-kitchen
//!
//! Pages are server-rendered; form posts answer with a 303 redirect and
//! leave any message behind as a one-shot notice for the next render.

pub mod auth;
pub mod buildinfo;
pub mod donate;
pub mod error;
pub mod health;
pub mod kitchen;
pub mod pages;
pub mod recipes;
pub mod saved;
pub mod sse;
pub mod ui;

pub use auth::auth_routes;
pub use buildinfo::buildinfo_routes;
pub use donate::donate_routes;
pub use error::ApiError;
pub use health::health_routes;
pub use kitchen::kitchen_routes;
pub use pages::page_routes;
pub use recipes::recipe_routes;
pub use saved::saved_routes;
pub use sse::sse_routes;
pub use ui::static_routes;
