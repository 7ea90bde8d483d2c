//! Audit log entity model and DTOs.
//!
//! Audit entries are immutable once created (no `updated_at`) and are
//! never mutated or deleted by the core.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use newhire_core::types::Timestamp;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: i64,
    pub onboarding_id: Uuid,
    pub action: String,
    pub message: String,
    pub actor_type: String,
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub actor_email: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub onboarding_id: Uuid,
    pub action: String,
    pub message: String,
    pub actor_type: String,
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub actor_email: String,
    pub metadata: Option<serde_json::Value>,
}

/// Sort direction for audit listings (`created_at` is the only sort key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Filter parameters for querying an onboarding's audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<Timestamp>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size, capped in the repository.
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort: SortDir,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
