pub mod auth;
pub mod health;
pub mod onboarding;
pub mod onboardings;
pub mod pdf_jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/me                                 admin identity (admin only)
///
/// /onboardings                             list, create (admin only)
/// /onboardings/{id}                        get
/// /onboardings/{id}/approve                accept a submission (POST)
/// /onboardings/{id}/request-modification   send back for changes (POST)
/// /onboardings/{id}/terminate              end the onboarding (POST)
/// /onboardings/{id}/resend-invite          re-mint the invite (POST)
/// /onboardings/{id}/audit-logs             audit trail (GET)
///
/// /onboarding/verify-invite                invite link check (public)
/// /onboarding/verify-otp                   OTP check, sets cookie (public)
/// /onboarding/session                      non-failing session probe
/// /onboarding/me                           own record (session)
/// /onboarding/form                         save draft (PUT, editable session)
/// /onboarding/submit                       hand to HR (POST, editable session)
///
/// /pdf-jobs                                queue generation (admin, POST)
/// /pdf-jobs/{job_id}                       poll status (admin, GET)
/// /pdf-jobs/{job_id}/status                generator callback (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(onboardings::router())
        .merge(onboarding::router())
        .merge(pdf_jobs::router())
}
