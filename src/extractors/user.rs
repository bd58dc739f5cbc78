//! Authenticated caller from the `Authorization: Bearer <token>` header.

use crate::auth::{JwtError, JwtService};
use crate::error::AppError;
use crate::model::User;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Caller with a valid token whose user record exists.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Authenticated caller with the admin flag set.
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let Some(header) = header else {
            tracing::warn!(uri = %parts.uri, "missing authorization header");
            return Err(AppError::Unauthorized("missing bearer token".into()));
        };
        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::Unauthorized("invalid authorization header".into()))?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "token rejected");
            match e {
                JwtError::ExpiredToken => AppError::Unauthorized("token expired".into()),
                _ => AppError::Unauthorized("invalid token".into()),
            }
        })?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("malformed token subject".into()))?;
        let user = state
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".into()))?;

        let user = AuthUser(user);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.admin {
            tracing::warn!(user = %user.id, uri = %parts.uri, "admin operation refused");
            return Err(AppError::AdminRequired);
        }
        Ok(AdminUser(user))
    }
}
