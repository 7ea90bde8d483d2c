use std::sync::Arc;

use crate::audit::AuditSink;
use crate::config::ServerConfig;
use crate::pdf::PdfClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: newhire_db::DbPool,
    /// Server configuration (admin allow-list, invite validity, URLs).
    pub config: Arc<ServerConfig>,
    /// Email collaborator. `None` when SMTP is not configured; sends are
    /// then logged and skipped (local development).
    pub mailer: Option<Arc<newhire_mailer::Mailer>>,
    /// Fire-and-forget audit trail sink.
    pub audit: AuditSink,
    /// External PDF-generation collaborator client.
    pub pdf: Arc<PdfClient>,
}
