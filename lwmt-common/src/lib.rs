//! # Less Waste, More Taste - common library
//!
//! Shared code for the kitchen service and its tests:
//! - Domain models (pantry items, recipes, places) and the freshness band
//! - Error type
//! - Password hashing
//! - Configuration loading and data folder resolution
//! - Event types and the EventBus used for push notifications
//! - SSE helpers
//! - Database initialization

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod sse;
pub mod time;

pub use error::{Error, Result};
pub use models::Freshness;
