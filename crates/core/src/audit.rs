//! Audit trail constants and actor types.
//!
//! This module lives in `core` (zero internal deps) so both the API layer
//! and any future CLI tooling agree on the closed action set. Entries are
//! append-only; the sink contract (never fails the triggering operation)
//! is enforced at the API layer.

use serde::{Deserialize, Serialize};

/// Known actions recorded against an onboarding.
pub mod actions {
    pub const ONBOARDING_CREATED: &str = "onboarding_created";
    pub const INVITE_SENT: &str = "invite_sent";
    pub const INVITE_RESENT: &str = "invite_resent";
    pub const OTP_VERIFIED: &str = "otp_verified";
    pub const FORM_SAVED: &str = "form_saved";
    pub const FORM_SUBMITTED: &str = "form_submitted";
    pub const MODIFICATION_REQUESTED: &str = "modification_requested";
    pub const APPROVED: &str = "approved";
    pub const TERMINATED: &str = "terminated";
    pub const PDF_REQUESTED: &str = "pdf_requested";
}

/// Kinds of actors that can trigger a state-changing action.
pub mod actor_types {
    pub const HR: &str = "HR";
    pub const EMPLOYEE: &str = "EMPLOYEE";
    pub const SYSTEM: &str = "SYSTEM";
}

/// Who performed an audited action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// One of [`actor_types`].
    pub actor_type: String,
    /// Stable identifier when one exists (admin subject, onboarding id).
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl Actor {
    pub fn hr(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Actor {
            actor_type: actor_types::HR.to_string(),
            id: Some(id.into()),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn employee(
        onboarding_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Actor {
            actor_type: actor_types::EMPLOYEE.to_string(),
            id: Some(onboarding_id.into()),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn system() -> Self {
        Actor {
            actor_type: actor_types::SYSTEM.to_string(),
            id: None,
            name: "system".to_string(),
            email: "system@newhire.local".to_string(),
        }
    }
}
