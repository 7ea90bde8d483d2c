//! Onboarding entity model and DTOs.
//!
//! `subsidiary`, `method`, and `status` are stored as TEXT and parsed into
//! the core enums on demand; the row is the document of record and the
//! core predicates operate on an [`AccessSnapshot`] extracted from it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use newhire_core::error::CoreError;
use newhire_core::onboarding::{AccessSnapshot, Method, Status, Subsidiary};
use newhire_core::types::Timestamp;

/// A row from the `onboardings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Onboarding {
    pub id: Uuid,
    pub subsidiary: String,
    pub method: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,

    /// Never serialized: credentials stay server-side.
    #[serde(skip_serializing)]
    pub invite_token_hash: Option<String>,
    pub invite_expires_at: Option<Timestamp>,
    pub invite_last_sent_at: Option<Timestamp>,

    #[serde(skip_serializing)]
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<Timestamp>,
    pub otp_attempts: i32,

    pub termination_type: Option<String>,
    pub termination_reason: Option<String>,
    pub terminated_at: Option<Timestamp>,

    pub form_data: Option<serde_json::Value>,
    pub is_form_complete: bool,
    pub is_completed: bool,
    pub submitted_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub modification_request_message: Option<String>,
    pub modification_requested_at: Option<Timestamp>,
    pub employee_number: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Onboarding {
    pub fn subsidiary(&self) -> Result<Subsidiary, CoreError> {
        Subsidiary::parse(&self.subsidiary)
    }

    pub fn method(&self) -> Result<Method, CoreError> {
        Method::parse(&self.method)
    }

    pub fn status(&self) -> Result<Status, CoreError> {
        Status::parse(&self.status)
    }

    /// Extract the fields the access predicates and session guard need.
    pub fn access_snapshot(&self) -> Result<AccessSnapshot, CoreError> {
        Ok(AccessSnapshot {
            method: self.method()?,
            status: self.status()?,
            invite_expires_at: self.invite_expires_at,
        })
    }
}

/// DTO for inserting a new onboarding.
#[derive(Debug, Clone)]
pub struct CreateOnboarding {
    pub subsidiary: Subsidiary,
    pub method: Method,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Initial status derived from the method.
    pub status: Status,
    /// Invite credential, present iff the method is DIGITAL.
    pub invite_token_hash: Option<String>,
    pub invite_expires_at: Option<Timestamp>,
}

/// Filter parameters for the admin onboarding list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingListQuery {
    pub status: Option<String>,
    pub subsidiary: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for onboarding listings.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingPage {
    pub items: Vec<Onboarding>,
    pub total: i64,
}
