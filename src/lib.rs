//! Kitaphana College Textbook Checkout System
//!
//! A REST JSON API for a college library: students request textbooks by
//! group, language and course; a librarian confirms physical handout
//! against scanned copy codes and tracks return.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod lookup;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
