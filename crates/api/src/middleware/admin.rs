//! Admin authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use newhire_core::cookie::extract_cookie;
use newhire_core::error::CoreError;

use crate::auth::admin::{validate_admin_token, ADMIN_COOKIE_NAME};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated HR admin, resolved from a signed token in either the
/// `Authorization: Bearer` header or the admin cookie, then checked
/// against the configured allow-list.
///
/// ```ignore
/// async fn my_handler(admin: AdminUser) -> AppResult<Json<()>> {
///     tracing::info!(admin = %admin.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
    pub name: String,
}

/// Pull the admin token from the request, header first, cookie second.
pub fn admin_token_from_parts(parts: &Parts) -> Option<String> {
    let header_token = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string());
    header_token.or_else(|| {
        parts
            .headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .and_then(|header| extract_cookie(header, ADMIN_COOKIE_NAME))
    })
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = admin_token_from_parts(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing admin credentials".into(),
            ))
        })?;

        let claims = validate_admin_token(&token, &state.config.admin).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if !state.config.admin.is_allowed(&claims.sub) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Not an authorized administrator".into(),
            )));
        }

        Ok(AdminUser {
            email: claims.sub,
            name: claims.name,
        })
    }
}
