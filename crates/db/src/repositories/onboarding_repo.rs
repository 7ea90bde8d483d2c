//! Repository for the `onboardings` table.
//!
//! Every status transition repeats its guard predicate inside the
//! UPDATE's WHERE clause and returns `None` when no row matched, so a
//! stale in-memory snapshot can never push a record through an illegal
//! transition. Uniqueness of the active (subsidiary, email) identity is
//! enforced by the partial index `uq_onboardings_active_identity`.

use sqlx::PgPool;
use uuid::Uuid;

use newhire_core::onboarding::{Status, TerminationType};
use newhire_core::types::Timestamp;

use crate::models::onboarding::{CreateOnboarding, Onboarding, OnboardingListQuery};

/// Column list for `onboardings` queries.
const COLUMNS: &str = "\
    id, subsidiary, method, first_name, last_name, email, status, \
    invite_token_hash, invite_expires_at, invite_last_sent_at, \
    otp_hash, otp_expires_at, otp_attempts, \
    termination_type, termination_reason, terminated_at, \
    form_data, is_form_complete, is_completed, submitted_at, completed_at, \
    modification_request_message, modification_requested_at, employee_number, \
    created_at, updated_at";

/// Statuses from which an employee submit is legal.
const EDITABLE_STATUSES: &str = "('INVITE_GENERATED', 'MODIFICATION_REQUESTED')";

/// Statuses in which a record awaits HR review.
const UNDER_REVIEW_STATUSES: &str = "('SUBMITTED', 'RESUBMITTED')";

/// Provides CRUD and transition operations for onboarding records.
pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Insert a new onboarding. A unique-violation on the active-identity
    /// index surfaces as `sqlx::Error::Database` with code 23505 and is
    /// classified as a conflict at the API boundary.
    pub async fn create(pool: &PgPool, input: &CreateOnboarding) -> Result<Onboarding, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboardings \
                (id, subsidiary, method, first_name, last_name, email, status, \
                 invite_token_hash, invite_expires_at, invite_last_sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let invite_sent_at = input.invite_token_hash.as_ref().map(|_| chrono::Utc::now());
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(Uuid::now_v7())
            .bind(input.subsidiary.as_str())
            .bind(input.method.as_str())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.status.as_str())
            .bind(&input.invite_token_hash)
            .bind(input.invite_expires_at)
            .bind(invite_sent_at)
            .fetch_one(pool)
            .await
    }

    /// Find an onboarding by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboardings WHERE id = $1");
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active (non-terminated) onboarding for an identity.
    pub async fn find_active_by_identity(
        pool: &PgPool,
        subsidiary: &str,
        email: &str,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboardings \
             WHERE subsidiary = $1 AND lower(email) = lower($2) AND status <> 'TERMINATED'"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(subsidiary)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the unique DIGITAL onboarding carrying an invite token hash.
    ///
    /// This is the single lookup performed by the session resolution
    /// guard. Terminated records never match: their invite is cleared.
    pub async fn find_digital_by_invite_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboardings \
             WHERE method = 'DIGITAL' AND invite_token_hash = $1"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// List onboardings with optional status/subsidiary filters.
    pub async fn list(
        pool: &PgPool,
        params: &OnboardingListQuery,
    ) -> Result<Vec<Onboarding>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).clamp(1, 200);
        let offset = params.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM onboardings \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::TEXT IS NULL OR subsidiary = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(&params.status)
            .bind(&params.subsidiary)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count onboardings matching the list filters.
    pub async fn count(pool: &PgPool, params: &OnboardingListQuery) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM onboardings \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::TEXT IS NULL OR subsidiary = $2)",
        )
        .bind(&params.status)
        .bind(&params.subsidiary)
        .fetch_one(pool)
        .await
    }

    /// Save a form draft without changing status.
    pub async fn update_form(
        pool: &PgPool,
        id: Uuid,
        form_data: &serde_json::Value,
        is_form_complete: bool,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET form_data = $2, is_form_complete = $3, updated_at = now() \
             WHERE id = $1 AND status IN {EDITABLE_STATUSES} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(form_data)
            .bind(is_form_complete)
            .fetch_optional(pool)
            .await
    }

    /// Record an employee submission: editable status -> `new_status`
    /// (SUBMITTED or RESUBMITTED), storing the final payload.
    pub async fn mark_submitted(
        pool: &PgPool,
        id: Uuid,
        new_status: Status,
        form_data: &serde_json::Value,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET status = $2, form_data = $3, is_form_complete = TRUE, \
                 submitted_at = now(), updated_at = now() \
             WHERE id = $1 AND status IN {EDITABLE_STATUSES} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(new_status.as_str())
            .bind(form_data)
            .fetch_optional(pool)
            .await
    }

    /// HR requests modification on a record under review.
    pub async fn request_modification(
        pool: &PgPool,
        id: Uuid,
        message: &str,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET status = 'MODIFICATION_REQUESTED', \
                 modification_request_message = $2, \
                 modification_requested_at = now(), updated_at = now() \
             WHERE id = $1 AND status IN {UNDER_REVIEW_STATUSES} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// HR approves a record under review. The invite is left intact;
    /// employee access is denied from the status alone.
    pub async fn approve(
        pool: &PgPool,
        id: Uuid,
        employee_number: Option<&str>,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET status = 'APPROVED', is_completed = TRUE, completed_at = now(), \
                 employee_number = COALESCE($2, employee_number), updated_at = now() \
             WHERE id = $1 AND status IN {UNDER_REVIEW_STATUSES} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(employee_number)
            .fetch_optional(pool)
            .await
    }

    /// HR terminates from any non-terminated status. Clears the invite
    /// and OTP so the record becomes unreachable by token lookup.
    pub async fn terminate(
        pool: &PgPool,
        id: Uuid,
        termination_type: TerminationType,
        reason: Option<&str>,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET status = 'TERMINATED', termination_type = $2, termination_reason = $3, \
                 terminated_at = now(), \
                 invite_token_hash = NULL, invite_expires_at = NULL, invite_last_sent_at = NULL, \
                 otp_hash = NULL, otp_expires_at = NULL, otp_attempts = 0, \
                 updated_at = now() \
             WHERE id = $1 AND status <> 'TERMINATED' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(termination_type.as_str())
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Re-mint the invite credential (resend flow).
    pub async fn set_invite(
        pool: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET invite_token_hash = $2, invite_expires_at = $3, \
                 invite_last_sent_at = now(), updated_at = now() \
             WHERE id = $1 AND method = 'DIGITAL' \
               AND status NOT IN ('APPROVED', 'TERMINATED') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Store a fresh OTP hash, resetting the attempt counter.
    pub async fn set_otp(
        pool: &PgPool,
        id: Uuid,
        otp_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings \
             SET otp_hash = $2, otp_expires_at = $3, otp_attempts = 0, updated_at = now() \
             WHERE id = $1 AND method = 'DIGITAL' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(otp_hash)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Record a failed OTP attempt.
    pub async fn increment_otp_attempts(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE onboardings SET otp_attempts = otp_attempts + 1, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Consume the OTP (on success or attempt exhaustion).
    pub async fn clear_otp(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE onboardings \
             SET otp_hash = NULL, otp_expires_at = NULL, otp_attempts = 0, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete a record. Compensating action for the create saga: deleting
    /// an already-deleted id affects zero rows and is not an error.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM onboardings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
