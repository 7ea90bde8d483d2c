//! Client for the external PDF-generation collaborator.
//!
//! The collaborator runs an asynchronous job model keyed by a generated
//! job id: the caller writes a PENDING status row first (see
//! `PdfJobRepo::create_pending`), dispatches the job over HTTP, and polls
//! the status endpoint. Progress callbacks from the collaborator land on
//! `POST /api/v1/pdf-jobs/{job_id}/status`. Retry and timeout semantics
//! belong to the collaborator; this client only dispatches and records.

use serde_json::json;
use uuid::Uuid;

use newhire_core::pdf::PdfJobState;
use newhire_db::models::pdf_job::UpdatePdfJob;
use newhire_db::repositories::PdfJobRepo;
use newhire_db::DbPool;
use newhire_mailer::EmailAttachment;

/// Dispatches generation jobs and fetches blank forms from the external
/// PDF service.
pub struct PdfClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl PdfClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Dispatch a generation job. Spawned fire-and-forget: a dispatch
    /// failure marks the already-written PENDING row as ERROR rather than
    /// failing the request that queued the job.
    pub fn dispatch(&self, pool: DbPool, job_id: Uuid, subsidiary: String, payload: serde_json::Value) {
        let Some(base) = self.base_url.clone() else {
            tracing::warn!(job_id = %job_id, "PDF service not configured; marking job as error");
            let pool = pool.clone();
            tokio::spawn(async move {
                mark_error(&pool, job_id, "PDF service not configured").await;
            });
            return;
        };

        let http = self.http.clone();
        tokio::spawn(async move {
            let result = http
                .post(format!("{base}/generate"))
                .json(&json!({
                    "jobId": job_id,
                    "subsidiary": subsidiary,
                    "payload": payload,
                }))
                .send()
                .await
                .and_then(|r| r.error_for_status());

            match result {
                Ok(_) => {
                    tracing::info!(job_id = %job_id, subsidiary = %subsidiary, "PDF job dispatched");
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "PDF job dispatch failed");
                    mark_error(&pool, job_id, "Failed to reach PDF service").await;
                }
            }
        });
    }

    /// Fetch the blank onboarding form for a subsidiary, base64-encoded,
    /// for attachment to the MANUAL-method welcome email.
    ///
    /// Returns `None` when the service is not configured; the email is
    /// then sent without an attachment.
    pub async fn fetch_blank_form(
        &self,
        subsidiary: &str,
    ) -> Result<Option<EmailAttachment>, reqwest::Error> {
        let Some(base) = &self.base_url else {
            return Ok(None);
        };

        #[derive(serde::Deserialize)]
        struct BlankFormResponse {
            name: String,
            #[serde(rename = "contentType")]
            content_type: String,
            base64: String,
        }

        let body: BlankFormResponse = self
            .http
            .get(format!("{base}/blank-form/{subsidiary}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Some(EmailAttachment {
            name: body.name,
            content_type: body.content_type,
            base64: body.base64,
        }))
    }
}

async fn mark_error(pool: &DbPool, job_id: Uuid, message: &str) {
    let update = UpdatePdfJob {
        state: PdfJobState::Error,
        progress_percent: 0,
        download_key: None,
        download_url: None,
        error_message: Some(message.to_string()),
    };
    if let Err(e) = PdfJobRepo::update(pool, job_id, &update).await {
        tracing::error!(job_id = %job_id, error = %e, "Failed to mark PDF job as error");
    }
}
