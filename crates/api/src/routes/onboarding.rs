use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::employee_onboarding;
use crate::state::AppState;

/// Mount the employee-facing routes under `/onboarding`.
///
/// `verify-invite` and `verify-otp` are public by design: the invite
/// token in the body is the credential. Everything else resolves the
/// session cookie.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/onboarding/verify-invite",
            post(employee_onboarding::verify_invite),
        )
        .route(
            "/onboarding/verify-otp",
            post(employee_onboarding::verify_otp),
        )
        .route("/onboarding/session", get(employee_onboarding::session))
        .route("/onboarding/me", get(employee_onboarding::me))
        .route("/onboarding/form", put(employee_onboarding::save_form))
        .route("/onboarding/submit", post(employee_onboarding::submit))
}
