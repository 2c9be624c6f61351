//! Login stub
//!
//! Exactly one username/password pair is accepted, taken from
//! [`AuthConfig`]. A match returns fixed tokens and the demo user; anything
//! else is an [`FixtureError::InvalidCredentials`] (HTTP 401). There is no
//! expiry, refresh or rate limiting.

use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{FixtureError, FixtureResult};
use crate::models::User;

/// `POST /login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Logged-in profile
    pub user: User,
}

/// Check `request` against the configured pair
pub fn authenticate(config: &AuthConfig, request: &LoginRequest, user: &User) -> FixtureResult<LoginResponse> {
    if request.username == config.username && request.password == config.password {
        tracing::info!(username = %request.username, "Login accepted");
        Ok(LoginResponse {
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
            user: user.clone(),
        })
    } else {
        tracing::warn!(username = %request.username, "Login rejected");
        Err(FixtureError::InvalidCredentials)
    }
}
