//! API handlers for Kitaphana REST endpoints

pub mod groups;
pub mod health;
pub mod openapi;
pub mod requests;
pub mod search;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, AppState};

/// Extractor asserting the caller is an authorized operator (librarian).
///
/// Authorization is a single capability token from configuration; the
/// surrounding deployment is free to put a real auth mechanism in front
/// and inject the token itself.
pub struct Operator;

#[async_trait]
impl FromRequestParts<AppState> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication("Invalid authorization header format".to_string()));
        }

        let token = &auth_header[7..];

        if token != state.config.operator.token {
            return Err(AppError::Authorization("Operator capability required".to_string()));
        }

        Ok(Operator)
    }
}
