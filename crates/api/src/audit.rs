//! Fire-and-forget audit trail sink.
//!
//! Every state-changing action against an onboarding is recorded here.
//! The sink is best-effort: the triggering business operation has already
//! committed by the time an entry is recorded, so a persistence failure
//! is logged and swallowed — it must never surface to the caller.

use serde_json::Value;
use uuid::Uuid;

use newhire_core::audit::Actor;
use newhire_db::models::audit::CreateAuditLog;
use newhire_db::repositories::AuditLogRepo;
use newhire_db::DbPool;

/// Records audit entries without blocking or failing the caller.
#[derive(Clone)]
pub struct AuditSink {
    pool: DbPool,
}

impl AuditSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an action against an onboarding. Spawned onto the runtime;
    /// insert failures are logged and never propagated.
    pub fn record(
        &self,
        onboarding_id: Uuid,
        action: &'static str,
        message: impl Into<String>,
        actor: Actor,
        metadata: Option<Value>,
    ) {
        let entry = CreateAuditLog {
            onboarding_id,
            action: action.to_string(),
            message: message.into(),
            actor_type: actor.actor_type,
            actor_id: actor.id,
            actor_name: actor.name,
            actor_email: actor.email,
            metadata,
        };
        let pool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(e) = AuditLogRepo::insert(&pool, &entry).await {
                tracing::warn!(
                    onboarding_id = %entry.onboarding_id,
                    action = %entry.action,
                    error = %e,
                    "Failed to persist audit log entry",
                );
            }
        });
    }
}
