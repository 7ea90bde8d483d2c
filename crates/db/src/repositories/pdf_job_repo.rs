//! Repository for the `pdf_jobs` table.

use sqlx::PgPool;
use uuid::Uuid;

use newhire_core::pdf::PdfJobState;

use crate::models::pdf_job::{PdfJob, UpdatePdfJob};

/// Column list for `pdf_jobs` queries.
const COLUMNS: &str = "\
    job_id, subsidiary, onboarding_id, state, progress_percent, \
    started_at, updated_at, download_key, download_url, error_message";

/// Provides status tracking for external PDF generation jobs.
pub struct PdfJobRepo;

impl PdfJobRepo {
    /// Write the initial PENDING row. Called before the job is dispatched
    /// so polling never sees an unknown id for an accepted job.
    pub async fn create_pending(
        pool: &PgPool,
        job_id: Uuid,
        subsidiary: &str,
        onboarding_id: Option<Uuid>,
    ) -> Result<PdfJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO pdf_jobs (job_id, subsidiary, onboarding_id, state) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PdfJob>(&query)
            .bind(job_id)
            .bind(subsidiary)
            .bind(onboarding_id)
            .bind(PdfJobState::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a job by id, scoped to its subsidiary.
    pub async fn find(
        pool: &PgPool,
        job_id: Uuid,
        subsidiary: &str,
    ) -> Result<Option<PdfJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pdf_jobs WHERE job_id = $1 AND subsidiary = $2");
        sqlx::query_as::<_, PdfJob>(&query)
            .bind(job_id)
            .bind(subsidiary)
            .fetch_optional(pool)
            .await
    }

    /// Apply a collaborator progress callback. Terminal states win: once a
    /// job is DONE or ERROR its row is no longer updated.
    pub async fn update(
        pool: &PgPool,
        job_id: Uuid,
        update: &UpdatePdfJob,
    ) -> Result<Option<PdfJob>, sqlx::Error> {
        let query = format!(
            "UPDATE pdf_jobs \
             SET state = $2, progress_percent = $3, download_key = $4, \
                 download_url = $5, error_message = $6, updated_at = now() \
             WHERE job_id = $1 AND state NOT IN ('DONE', 'ERROR') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PdfJob>(&query)
            .bind(job_id)
            .bind(update.state.as_str())
            .bind(update.progress_percent)
            .bind(&update.download_key)
            .bind(&update.download_url)
            .bind(&update.error_message)
            .fetch_optional(pool)
            .await
    }
}
