//! Employee-facing onboarding endpoints.
//!
//! Session establishment is two-step: the invite link proves possession
//! of the emailed token, the OTP proves control of the mailbox right now.
//! Only then is the session cookie set, carrying the raw invite token;
//! every later request reconstructs the session from it.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use newhire_core::audit::{actions, Actor};
use newhire_core::cookie;
use newhire_core::error::{CoreError, RevokedReason};
use newhire_core::forms::FormPayload;
use newhire_core::onboarding::{can_edit, is_read_only, submit_target, Status};
use newhire_core::otp::{check_otp, generate_otp, OtpCheck, OTP_TTL_MINUTES};
use newhire_core::session::SessionMode;
use newhire_core::token::hash_token;
use newhire_core::types::Timestamp;
use newhire_db::models::onboarding::Onboarding;
use newhire_db::repositories::OnboardingRepo;
use newhire_mailer::templates;

use crate::error::{AppError, AppResult};
use crate::middleware::employee::{resolve_session, EditableSession, EmployeeSession};
use crate::response::DataResponse;
use crate::state::AppState;

/// What an employee may see of their own record. Credentials, HR-side
/// bookkeeping, and other employees' data never appear here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOnboardingView {
    pub id: Uuid,
    pub subsidiary: String,
    pub method: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
    pub form_data: Option<serde_json::Value>,
    pub is_form_complete: bool,
    pub modification_request_message: Option<String>,
    pub invite_expires_at: Option<Timestamp>,
    pub submitted_at: Option<Timestamp>,
    /// Whether the form accepts edits right now.
    pub can_edit: bool,
    /// Whether the record is visible but frozen (under review).
    pub read_only: bool,
}

impl EmployeeOnboardingView {
    fn from_onboarding(onboarding: Onboarding) -> Result<Self, CoreError> {
        let snap = onboarding.access_snapshot()?;
        let now = Utc::now();
        Ok(Self {
            id: onboarding.id,
            subsidiary: onboarding.subsidiary,
            method: onboarding.method,
            first_name: onboarding.first_name,
            last_name: onboarding.last_name,
            email: onboarding.email,
            status: onboarding.status,
            form_data: onboarding.form_data,
            is_form_complete: onboarding.is_form_complete,
            modification_request_message: onboarding.modification_request_message,
            invite_expires_at: onboarding.invite_expires_at,
            submitted_at: onboarding.submitted_at,
            can_edit: can_edit(&snap, now),
            read_only: is_read_only(&snap, now),
        })
    }
}

/// Request body for `POST /api/v1/onboarding/verify-invite`.
#[derive(Debug, Deserialize)]
pub struct VerifyInviteRequest {
    pub token: String,
}

/// `POST /api/v1/onboarding/verify-invite` — validate the invite link and
/// send an OTP to the employee's mailbox.
///
/// An unknown token and a cleared (terminated) token are the same
/// failure: nothing matched. No record existence is leaked.
pub async fn verify_invite(
    State(state): State<AppState>,
    Json(payload): Json<VerifyInviteRequest>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let onboarding = resolve_invite(&state, &payload.token).await?;

    let code = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
    OnboardingRepo::set_otp(&state.pool, onboarding.id, &hash_token(&code), expires_at)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Failed to store verification code".to_string())
        })?;

    if let Some(mailer) = &state.mailer {
        mailer
            .send(&templates::otp(&onboarding.email, &onboarding.first_name, &code))
            .await?;
    } else {
        tracing::warn!(id = %onboarding.id, "SMTP not configured; skipping OTP email");
    }

    Ok(Json(DataResponse {
        data: json!({
            "otpSent": true,
            "email": mask_email(&onboarding.email),
            "expiresInMinutes": OTP_TTL_MINUTES,
        }),
    }))
}

/// Request body for `POST /api/v1/onboarding/verify-otp`.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub token: String,
    pub otp: String,
}

/// `POST /api/v1/onboarding/verify-otp` — check the OTP and, on success,
/// establish the session by setting the cookie.
///
/// The cookie's `Max-Age` is clamped to the invite's remaining validity,
/// so the cookie never outlives the credential behind it.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<(HeaderMap, Json<DataResponse<EmployeeOnboardingView>>)> {
    let onboarding = resolve_invite(&state, &payload.token).await?;

    let outcome = check_otp(
        onboarding.otp_hash.as_deref(),
        onboarding.otp_expires_at,
        onboarding.otp_attempts,
        payload.otp.trim(),
        Utc::now(),
    )?;
    match outcome {
        OtpCheck::Accepted => {
            OnboardingRepo::clear_otp(&state.pool, onboarding.id).await?;
        }
        OtpCheck::Rejected => {
            OnboardingRepo::increment_otp_attempts(&state.pool, onboarding.id).await?;
            return Err(CoreError::Unauthorized("Incorrect verification code".to_string()).into());
        }
        OtpCheck::RejectedAndExhausted => {
            OnboardingRepo::clear_otp(&state.pool, onboarding.id).await?;
            return Err(CoreError::Unauthorized(
                "Too many incorrect attempts; verify the invite again".to_string(),
            )
            .into());
        }
    }

    let expires_at = onboarding.invite_expires_at.ok_or_else(|| {
        AppError::InternalError("DIGITAL onboarding without invite expiry".to_string())
    })?;
    let max_age = cookie::remaining_max_age(expires_at, Utc::now())?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie::issue(&payload.token, max_age)
            .parse()
            .map_err(|_| AppError::InternalError("Invalid session cookie value".to_string()))?,
    );

    state.audit.record(
        onboarding.id,
        actions::OTP_VERIFIED,
        "Employee verified their identity and started a session".to_string(),
        Actor::employee(
            onboarding.id.to_string(),
            format!("{} {}", onboarding.first_name, onboarding.last_name),
            onboarding.email.clone(),
        ),
        None,
    );

    let view = EmployeeOnboardingView::from_onboarding(onboarding)?;
    Ok((headers, Json(DataResponse { data: view })))
}

/// Session probe response for `GET /api/v1/onboarding/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProbe {
    pub has_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_id: Option<Uuid>,
}

/// `GET /api/v1/onboarding/session` — non-failing session probe for the
/// frontend. Always 200; an unresolvable session is content, not an
/// error, and the cookie is left alone.
pub async fn session(parts: Parts, State(state): State<AppState>) -> Json<DataResponse<SessionProbe>> {
    let probe = match resolve_session(&parts, &state, SessionMode::ReadOnly).await {
        Ok(onboarding) => SessionProbe {
            has_session: true,
            onboarding_id: Some(onboarding.id),
        },
        Err(_) => SessionProbe {
            has_session: false,
            onboarding_id: None,
        },
    };
    Json(DataResponse { data: probe })
}

/// `GET /api/v1/onboarding/me` — the employee's own record, resolved from
/// the session cookie. Works in read-only states too.
pub async fn me(
    EmployeeSession(onboarding): EmployeeSession,
) -> AppResult<Json<DataResponse<EmployeeOnboardingView>>> {
    let view = EmployeeOnboardingView::from_onboarding(onboarding)?;
    Ok(Json(DataResponse { data: view }))
}

/// `PUT /api/v1/onboarding/form` — save a form draft. Whole-payload
/// replacement; the last writer wins.
pub async fn save_form(
    State(state): State<AppState>,
    EditableSession(onboarding): EditableSession,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<EmployeeOnboardingView>>> {
    let payload = FormPayload::parse(onboarding.subsidiary()?, body)?;
    let is_complete = payload.is_complete();

    let updated = OnboardingRepo::update_form(&state.pool, onboarding.id, &payload.to_value(), is_complete)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("The onboarding is no longer editable".to_string())
        })?;

    state.audit.record(
        onboarding.id,
        actions::FORM_SAVED,
        "Employee saved their onboarding form".to_string(),
        Actor::employee(
            onboarding.id.to_string(),
            format!("{} {}", onboarding.first_name, onboarding.last_name),
            onboarding.email.clone(),
        ),
        Some(json!({ "isFormComplete": is_complete })),
    );

    let view = EmployeeOnboardingView::from_onboarding(updated)?;
    Ok(Json(DataResponse { data: view }))
}

/// `POST /api/v1/onboarding/submit` — hand the completed form to HR.
///
/// Target status depends on origin: first submission goes to SUBMITTED, a
/// post-modification submission to RESUBMITTED. A double submit loses the
/// guarded UPDATE race and gets a conflict.
pub async fn submit(
    State(state): State<AppState>,
    EditableSession(onboarding): EditableSession,
) -> AppResult<Json<DataResponse<EmployeeOnboardingView>>> {
    let form_data = onboarding.form_data.clone().ok_or_else(|| {
        CoreError::Validation("The onboarding form has not been filled in".to_string())
    })?;
    let payload = FormPayload::parse(onboarding.subsidiary()?, form_data)?;
    if !payload.is_complete() {
        return Err(CoreError::Validation(
            "The onboarding form is incomplete".to_string(),
        )
        .into());
    }

    let target = submit_target(onboarding.status()?)?;
    let updated = OnboardingRepo::mark_submitted(&state.pool, onboarding.id, target, &payload.to_value())
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("The onboarding was already submitted".to_string())
        })?;

    state.audit.record(
        onboarding.id,
        actions::FORM_SUBMITTED,
        match target {
            Status::Resubmitted => "Employee resubmitted their onboarding form".to_string(),
            _ => "Employee submitted their onboarding form".to_string(),
        },
        Actor::employee(
            onboarding.id.to_string(),
            format!("{} {}", onboarding.first_name, onboarding.last_name),
            onboarding.email.clone(),
        ),
        None,
    );

    let view = EmployeeOnboardingView::from_onboarding(updated)?;
    Ok(Json(DataResponse { data: view }))
}

/// Resolve an invite token to its DIGITAL onboarding and check access.
///
/// Closed records report why (the frontend shows a terminal page), an
/// expired or unknown token reports a validation failure.
async fn resolve_invite(state: &AppState, raw_token: &str) -> Result<Onboarding, AppError> {
    let onboarding =
        OnboardingRepo::find_digital_by_invite_hash(&state.pool, &hash_token(raw_token))
            .await?
            .ok_or_else(|| {
                CoreError::Validation("Invalid or expired invite link".to_string())
            })?;

    match onboarding.status()? {
        Status::Approved => {
            return Err(CoreError::AccessRevoked(RevokedReason::Approved).into());
        }
        Status::Terminated => {
            // Terminated records have their invite cleared, so this arm is
            // unreachable in practice; kept as a safety net.
            return Err(CoreError::AccessRevoked(RevokedReason::Terminated).into());
        }
        _ => {}
    }

    match onboarding.invite_expires_at {
        Some(exp) if exp > Utc::now() => Ok(onboarding),
        _ => Err(CoreError::Validation("Invalid or expired invite link".to_string()).into()),
    }
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(2).collect();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_email_keeps_domain() {
        assert_eq!(mask_email("priya.sharma@example.com"), "pr***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
