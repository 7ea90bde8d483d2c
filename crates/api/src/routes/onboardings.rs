use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin_onboarding, audit};
use crate::state::AppState;

/// Mount the admin onboarding management routes under `/onboardings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/onboardings",
            get(admin_onboarding::list).post(admin_onboarding::create),
        )
        .route("/onboardings/{id}", get(admin_onboarding::get))
        .route("/onboardings/{id}/approve", post(admin_onboarding::approve))
        .route(
            "/onboardings/{id}/request-modification",
            post(admin_onboarding::request_modification),
        )
        .route(
            "/onboardings/{id}/terminate",
            post(admin_onboarding::terminate),
        )
        .route(
            "/onboardings/{id}/resend-invite",
            post(admin_onboarding::resend_invite),
        )
        .route("/onboardings/{id}/audit-logs", get(audit::list))
}
