use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pdf_jobs;
use crate::state::AppState;

/// Mount the PDF generation job routes under `/pdf-jobs`.
///
/// The status callback is unauthenticated on purpose: the generator is a
/// trusted internal collaborator and the callback can only move a known
/// job id forward, never read data.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pdf-jobs", post(pdf_jobs::create))
        .route("/pdf-jobs/{job_id}", get(pdf_jobs::get))
        .route("/pdf-jobs/{job_id}/status", post(pdf_jobs::status_callback))
}
