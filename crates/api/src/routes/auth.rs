use axum::routing::get;
use axum::Router;

use crate::handlers::admin_auth;
use crate::state::AppState;

/// Mount admin identity routes under `/auth`.
pub fn router() -> Router<AppState> {
    Router::new().route("/auth/me", get(admin_auth::me))
}
