//! Repository for the `audit_logs` table.
//!
//! Insert and filtered listing only: the trail is append-only and entries
//! are never mutated or deleted by the core.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audit::{AuditLog, AuditLogQuery, CreateAuditLog};

/// Column list for `audit_logs` queries.
const COLUMNS: &str = "\
    id, onboarding_id, action, message, actor_type, actor_id, \
    actor_name, actor_email, metadata, created_at";

/// Hard cap on the audit page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default audit page size.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Insert a new audit log entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs \
                (onboarding_id, action, message, actor_type, actor_id, \
                 actor_name, actor_email, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.onboarding_id)
            .bind(&entry.action)
            .bind(&entry.message)
            .bind(&entry.actor_type)
            .bind(&entry.actor_id)
            .bind(&entry.actor_name)
            .bind(&entry.actor_email)
            .bind(&entry.metadata)
            .fetch_one(pool)
            .await
    }

    /// List entries for one onboarding with optional inclusive date range,
    /// pagination, and `created_at` sort direction.
    pub async fn list_by_onboarding(
        pool: &PgPool,
        onboarding_id: Uuid,
        params: &AuditLogQuery,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * page_size;

        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs \
             WHERE onboarding_id = $1 \
               AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR created_at <= $3) \
             ORDER BY created_at {} \
             LIMIT $4 OFFSET $5",
            params.sort.as_sql()
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(onboarding_id)
            .bind(params.from)
            .bind(params.to)
            .bind(page_size)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count_by_onboarding(
        pool: &PgPool,
        onboarding_id: Uuid,
        params: &AuditLogQuery,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM audit_logs \
             WHERE onboarding_id = $1 \
               AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR created_at <= $3)",
        )
        .bind(onboarding_id)
        .bind(params.from)
        .bind(params.to)
        .fetch_one(pool)
        .await
    }
}
