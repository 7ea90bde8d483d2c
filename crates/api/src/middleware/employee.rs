//! Employee session extractors — the session resolution guard.
//!
//! The session cookie carries the raw invite token. Resolution hashes it,
//! performs the single unique lookup against DIGITAL onboardings, and
//! hands the snapshot to the pure evaluation in `newhire_core::session`.
//! There is no server-side session table: the session is reconstructed
//! from the cookie on every request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use newhire_core::cookie::extract_session_cookie;
use newhire_core::error::{CoreError, SessionRequiredReason};
use newhire_core::session::{evaluate_session, SessionMode};
use newhire_core::token::hash_token;
use newhire_db::models::onboarding::Onboarding;
use newhire_db::repositories::OnboardingRepo;

use crate::error::AppError;
use crate::state::AppState;

/// A resolved employee session in read-only mode. Records under review
/// (SUBMITTED/RESUBMITTED) still resolve.
pub struct EmployeeSession(pub Onboarding);

/// A resolved employee session with write access. Rejects records under
/// review with 403 so mutation endpoints cannot silently edit a
/// submission awaiting HR.
pub struct EditableSession(pub Onboarding);

/// Resolve the session cookie to its onboarding record, or fail with the
/// typed session error for the given mode.
pub async fn resolve_session(
    parts: &Parts,
    state: &AppState,
    mode: SessionMode,
) -> Result<Onboarding, AppError> {
    let raw_token = parts
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(extract_session_cookie)
        .ok_or(CoreError::SessionRequired(
            SessionRequiredReason::MissingCookie,
        ))?;

    let token_hash = hash_token(&raw_token);
    let onboarding = OnboardingRepo::find_digital_by_invite_hash(&state.pool, &token_hash)
        .await?
        .ok_or(CoreError::SessionRequired(SessionRequiredReason::NoMatch))?;

    let snapshot = onboarding.access_snapshot()?;
    evaluate_session(&snapshot, Utc::now(), mode)?;
    Ok(onboarding)
}

impl FromRequestParts<AppState> for EmployeeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let onboarding = resolve_session(parts, state, SessionMode::ReadOnly).await?;
        Ok(EmployeeSession(onboarding))
    }
}

impl FromRequestParts<AppState> for EditableSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let onboarding = resolve_session(parts, state, SessionMode::ReadWrite).await?;
        Ok(EditableSession(onboarding))
    }
}
