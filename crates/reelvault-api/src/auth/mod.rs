//! Bearer authentication.
//!
//! Handlers authenticate explicitly rather than through a middleware layer:
//! the upload pipeline must resolve the caller before the record lookup and
//! the ownership check, and all of that before the body is touched.

pub mod jwt;
pub mod models;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use reelvault_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub use jwt::{make_jwt, JwtAuthenticator};

/// Resolves a bearer credential to a user id.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Uuid, AppError>;
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Couldn't find JWT".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    Ok(token.to_string())
}

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
}

impl AuthState {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Bearer extraction followed by credential validation.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<Uuid, AppError> {
        let token = get_bearer_token(headers)?;
        self.authenticator.authenticate(&token)
    }
}
