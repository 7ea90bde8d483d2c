//! PDF generation job endpoints.
//!
//! Queueing writes the PENDING status row before dispatching to the
//! external generator, so a poll for an accepted job id never comes back
//! unknown. Dispatch itself is fire-and-forget; a dispatch failure lands
//! in the row as ERROR for the next poll to see.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use newhire_core::audit::{actions, Actor};
use newhire_core::error::CoreError;
use newhire_core::onboarding::Subsidiary;
use newhire_core::pdf::PdfJobState;
use newhire_db::models::pdf_job::{PdfJob, UpdatePdfJob};
use newhire_db::repositories::{OnboardingRepo, PdfJobRepo};

use crate::error::AppResult;
use crate::middleware::admin::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/pdf-jobs`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePdfJobRequest {
    pub subsidiary: String,
    pub onboarding_id: Uuid,
}

/// `POST /api/v1/pdf-jobs` — queue generation of the filled onboarding
/// PDF for a record. Returns 202 with the job id to poll.
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreatePdfJobRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<serde_json::Value>>)> {
    let subsidiary = Subsidiary::parse(&payload.subsidiary)?;
    let onboarding = OnboardingRepo::find_by_id(&state.pool, payload.onboarding_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Onboarding",
            id: payload.onboarding_id.to_string(),
        })?;
    if onboarding.subsidiary != subsidiary.as_str() {
        return Err(CoreError::Validation(
            "Onboarding does not belong to the given subsidiary".to_string(),
        )
        .into());
    }
    let form_data = onboarding.form_data.clone().ok_or_else(|| {
        CoreError::Validation("The onboarding has no form data to render".to_string())
    })?;

    let job_id = Uuid::now_v7();
    PdfJobRepo::create_pending(&state.pool, job_id, subsidiary.as_str(), Some(onboarding.id))
        .await?;
    state.pdf.dispatch(
        state.pool.clone(),
        job_id,
        subsidiary.as_str().to_string(),
        json!({
            "firstName": onboarding.first_name,
            "lastName": onboarding.last_name,
            "email": onboarding.email,
            "form": form_data,
        }),
    );

    state.audit.record(
        onboarding.id,
        actions::PDF_REQUESTED,
        format!("PDF generation requested (job {job_id})"),
        Actor::hr(&admin.email, &admin.name, &admin.email),
        Some(json!({ "jobId": job_id })),
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: json!({ "jobId": job_id }),
        }),
    ))
}

/// Query parameters for the job status poll.
#[derive(Debug, Deserialize)]
pub struct PdfJobStatusParams {
    pub subsidiary: String,
}

/// `GET /api/v1/pdf-jobs/{job_id}?subsidiary=...` — poll job status.
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
    Query(params): Query<PdfJobStatusParams>,
) -> AppResult<Json<DataResponse<PdfJob>>> {
    let subsidiary = Subsidiary::parse(&params.subsidiary)?;
    let job = PdfJobRepo::find(&state.pool, job_id, subsidiary.as_str())
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "PdfJob",
            id: job_id.to_string(),
        })?;
    Ok(Json(DataResponse { data: job }))
}

/// Progress callback body from the generator.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfJobCallback {
    pub state: String,
    #[serde(default)]
    pub progress_percent: i16,
    pub download_key: Option<String>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
}

/// `POST /api/v1/pdf-jobs/{job_id}/status` — progress callback from the
/// generator. Updates to a job already in a terminal state are ignored.
pub async fn status_callback(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<PdfJobCallback>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    // The state string comes from the collaborator, not from storage;
    // unknown values are the caller's problem, not an internal error.
    let job_state = PdfJobState::parse(&payload.state)
        .map_err(|_| CoreError::Validation(format!("Unknown job state '{}'", payload.state)))?;
    let update = UpdatePdfJob {
        state: job_state,
        progress_percent: payload.progress_percent.clamp(0, 100),
        download_key: payload.download_key,
        download_url: payload.download_url,
        error_message: payload.error_message,
    };

    let applied = PdfJobRepo::update(&state.pool, job_id, &update).await?;
    if applied.is_none() {
        tracing::debug!(job_id = %job_id, "Ignoring callback for unknown or finished PDF job");
    }
    Ok(Json(DataResponse {
        data: json!({ "applied": applied.is_some() }),
    }))
}
