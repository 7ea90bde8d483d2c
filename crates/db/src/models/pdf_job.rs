//! PDF generation job status model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use newhire_core::error::CoreError;
use newhire_core::pdf::PdfJobState;
use newhire_core::types::Timestamp;

/// A row from the `pdf_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PdfJob {
    pub job_id: Uuid,
    pub subsidiary: String,
    pub onboarding_id: Option<Uuid>,
    pub state: String,
    pub progress_percent: i16,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    pub download_key: Option<String>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
}

impl PdfJob {
    pub fn state(&self) -> Result<PdfJobState, CoreError> {
        PdfJobState::parse(&self.state)
    }
}

/// DTO for collaborator progress callbacks.
#[derive(Debug, Clone)]
pub struct UpdatePdfJob {
    pub state: PdfJobState,
    pub progress_percent: i16,
    pub download_key: Option<String>,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
}
