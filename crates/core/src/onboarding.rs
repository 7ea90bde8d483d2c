//! Onboarding lifecycle state machine.
//!
//! The lifecycle for DIGITAL onboardings is:
//!
//! ```text
//! INVITE_GENERATED -> SUBMITTED -> (MODIFICATION_REQUESTED -> RESUBMITTED)* -> APPROVED
//! ```
//!
//! MANUAL onboardings sit in `MANUAL_PDF_SENT` and never pass through the
//! OTP-gated states; HR manages them externally. `TERMINATED` is reachable
//! from any non-terminal state via explicit HR action and is absorbing.
//!
//! Employee access and edit rights are *computed* from (status, method,
//! invite expiry) rather than stored, so a single source of truth cannot
//! drift from what the UI believes is permitted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Closed sets
// ---------------------------------------------------------------------------

/// Subsidiary a hire belongs to. Only INDIA is currently activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Subsidiary {
    India,
    Canada,
    Usa,
}

impl Subsidiary {
    pub fn as_str(self) -> &'static str {
        match self {
            Subsidiary::India => "INDIA",
            Subsidiary::Canada => "CANADA",
            Subsidiary::Usa => "USA",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "INDIA" => Ok(Subsidiary::India),
            "CANADA" => Ok(Subsidiary::Canada),
            "USA" => Ok(Subsidiary::Usa),
            other => Err(CoreError::Validation(format!(
                "Unknown subsidiary '{other}'"
            ))),
        }
    }

    /// Whether onboardings may currently be created for this subsidiary.
    pub fn is_activated(self) -> bool {
        matches!(self, Subsidiary::India)
    }
}

/// How the hire is onboarded. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    Digital,
    Manual,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Digital => "DIGITAL",
            Method::Manual => "MANUAL",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "DIGITAL" => Ok(Method::Digital),
            "MANUAL" => Ok(Method::Manual),
            other => Err(CoreError::Validation(format!("Unknown method '{other}'"))),
        }
    }
}

/// Lifecycle status of an onboarding record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    InviteGenerated,
    ModificationRequested,
    Submitted,
    Resubmitted,
    Approved,
    Terminated,
    ManualPdfSent,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::InviteGenerated => "INVITE_GENERATED",
            Status::ModificationRequested => "MODIFICATION_REQUESTED",
            Status::Submitted => "SUBMITTED",
            Status::Resubmitted => "RESUBMITTED",
            Status::Approved => "APPROVED",
            Status::Terminated => "TERMINATED",
            Status::ManualPdfSent => "MANUAL_PDF_SENT",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "INVITE_GENERATED" => Ok(Status::InviteGenerated),
            "MODIFICATION_REQUESTED" => Ok(Status::ModificationRequested),
            "SUBMITTED" => Ok(Status::Submitted),
            "RESUBMITTED" => Ok(Status::Resubmitted),
            "APPROVED" => Ok(Status::Approved),
            "TERMINATED" => Ok(Status::Terminated),
            "MANUAL_PDF_SENT" => Ok(Status::ManualPdfSent),
            other => Err(CoreError::Internal(format!(
                "Unknown onboarding status '{other}' in storage"
            ))),
        }
    }

    /// Statuses awaiting HR review.
    pub fn is_under_review(self) -> bool {
        matches!(self, Status::Submitted | Status::Resubmitted)
    }
}

/// Who initiated a termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationType {
    CompanyInitiated,
    Resigned,
}

impl TerminationType {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminationType::CompanyInitiated => "COMPANY_INITIATED",
            TerminationType::Resigned => "RESIGNED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "COMPANY_INITIATED" => Ok(TerminationType::CompanyInitiated),
            "RESIGNED" => Ok(TerminationType::Resigned),
            other => Err(CoreError::Validation(format!(
                "Unknown termination type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Access predicates
// ---------------------------------------------------------------------------

/// The fields of an onboarding record that determine employee access.
///
/// Extracted from the stored row once per request so the pure predicates
/// below can be unit-tested without a database.
#[derive(Debug, Clone, Copy)]
pub struct AccessSnapshot {
    pub method: Method,
    pub status: Status,
    /// Invite expiry, `None` when the invite is absent or was cleared.
    pub invite_expires_at: Option<Timestamp>,
}

/// Whether the employee may reach their onboarding at all.
///
/// True iff the onboarding is DIGITAL, an unexpired invite is present, and
/// the status has not permanently revoked access. An unexpired invite is
/// necessary but not sufficient.
pub fn can_access(snap: &AccessSnapshot, now: Timestamp) -> bool {
    snap.method == Method::Digital
        && snap.invite_expires_at.is_some_and(|exp| exp > now)
        && !matches!(snap.status, Status::Approved | Status::Terminated)
}

/// Whether the employee may modify the form payload.
pub fn can_edit(snap: &AccessSnapshot, now: Timestamp) -> bool {
    can_access(snap, now)
        && matches!(
            snap.status,
            Status::InviteGenerated | Status::ModificationRequested
        )
}

/// Whether the employee sees the record in read-only mode.
pub fn is_read_only(snap: &AccessSnapshot, now: Timestamp) -> bool {
    !can_access(snap, now) || snap.status.is_under_review()
}

// ---------------------------------------------------------------------------
// Transition guards
// ---------------------------------------------------------------------------
//
// Each HR- or employee-triggered transition re-checks the current status
// and is rejected with a domain error rather than silently no-op'd. The
// repository layer repeats the status predicate inside the UPDATE's WHERE
// clause so the database row stays the final arbiter under concurrency.

/// Target status of an employee submit, given the current status.
///
/// First submission moves `INVITE_GENERATED -> SUBMITTED`; a submission
/// after a modification-request cycle moves
/// `MODIFICATION_REQUESTED -> RESUBMITTED`.
pub fn submit_target(status: Status) -> Result<Status, CoreError> {
    match status {
        Status::InviteGenerated => Ok(Status::Submitted),
        Status::ModificationRequested => Ok(Status::Resubmitted),
        other => Err(CoreError::Forbidden(format!(
            "Onboarding is read-only in status {}",
            other.as_str()
        ))),
    }
}

/// HR may request modification only while the record is under review.
pub fn check_request_modification(status: Status) -> Result<(), CoreError> {
    if status.is_under_review() {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot request modification in status {}",
            status.as_str()
        )))
    }
}

/// HR may approve only a record under review.
pub fn check_approve(status: Status) -> Result<(), CoreError> {
    if status.is_under_review() {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot approve in status {}",
            status.as_str()
        )))
    }
}

/// HR may terminate from any status except TERMINATED itself (absorbing).
pub fn check_terminate(status: Status) -> Result<(), CoreError> {
    if status == Status::Terminated {
        Err(CoreError::Conflict(
            "Onboarding is already terminated".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Initial status for a freshly created onboarding.
pub fn initial_status(method: Method) -> Status {
    match method {
        Method::Digital => Status::InviteGenerated,
        Method::Manual => Status::ManualPdfSent,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::CoreError;

    fn digital(status: Status, expires_in: Option<Duration>) -> AccessSnapshot {
        AccessSnapshot {
            method: Method::Digital,
            status,
            invite_expires_at: expires_in.map(|d| Utc::now() + d),
        }
    }

    #[test]
    fn fresh_digital_onboarding_is_editable() {
        let now = Utc::now();
        let snap = digital(Status::InviteGenerated, Some(Duration::hours(72)));
        assert!(can_access(&snap, now));
        assert!(can_edit(&snap, now));
        assert!(!is_read_only(&snap, now));
    }

    #[test]
    fn manual_onboarding_never_grants_access() {
        let now = Utc::now();
        let snap = AccessSnapshot {
            method: Method::Manual,
            status: Status::ManualPdfSent,
            invite_expires_at: None,
        };
        assert!(!can_access(&snap, now));
        assert!(!can_edit(&snap, now));
        assert!(is_read_only(&snap, now));
    }

    #[test]
    fn submitted_record_is_read_only_but_accessible() {
        let now = Utc::now();
        for status in [Status::Submitted, Status::Resubmitted] {
            let snap = digital(status, Some(Duration::hours(1)));
            assert!(can_access(&snap, now));
            assert!(!can_edit(&snap, now));
            assert!(is_read_only(&snap, now));
        }
    }

    #[test]
    fn modification_request_reenables_edit() {
        let now = Utc::now();
        let snap = digital(Status::ModificationRequested, Some(Duration::hours(1)));
        assert!(can_edit(&snap, now));
        assert!(!is_read_only(&snap, now));
    }

    #[test]
    fn approved_and_terminated_revoke_access() {
        let now = Utc::now();
        // Invite left intact on approval; status alone denies.
        for status in [Status::Approved, Status::Terminated] {
            let snap = digital(status, Some(Duration::hours(1)));
            assert!(!can_access(&snap, now));
            assert!(!can_edit(&snap, now));
            assert!(is_read_only(&snap, now));
        }
    }

    #[test]
    fn expired_invite_denies_access_regardless_of_status() {
        let now = Utc::now();
        let snap = digital(Status::InviteGenerated, Some(Duration::seconds(-1)));
        assert!(!can_access(&snap, now));
        assert!(!can_edit(&snap, now));
        assert!(is_read_only(&snap, now));
    }

    // Property: canEdit implies canAccess; isReadOnly implies
    // (!canAccess or status under review). Checked over the full grid.
    #[test]
    fn predicate_implications_hold_for_all_snapshots() {
        let now = Utc::now();
        let statuses = [
            Status::InviteGenerated,
            Status::ModificationRequested,
            Status::Submitted,
            Status::Resubmitted,
            Status::Approved,
            Status::Terminated,
            Status::ManualPdfSent,
        ];
        let expiries = [None, Some(Duration::hours(-1)), Some(Duration::hours(1))];
        for method in [Method::Digital, Method::Manual] {
            for status in statuses {
                for expiry in expiries {
                    let snap = AccessSnapshot {
                        method,
                        status,
                        invite_expires_at: expiry.map(|d| Utc::now() + d),
                    };
                    if can_edit(&snap, now) {
                        assert!(can_access(&snap, now), "can_edit must imply can_access");
                    }
                    if is_read_only(&snap, now) {
                        assert!(
                            !can_access(&snap, now) || snap.status.is_under_review(),
                            "is_read_only must imply no access or under review"
                        );
                    }
                }
            }
        }
    }

    // Expiry monotonicity: once past the invite expiry, access never
    // comes back for any later `now`.
    #[test]
    fn access_is_monotone_in_expiry() {
        let created = Utc::now();
        let snap = AccessSnapshot {
            method: Method::Digital,
            status: Status::InviteGenerated,
            invite_expires_at: Some(created + Duration::hours(72)),
        };
        assert!(can_access(&snap, created));
        let after_expiry = created + Duration::hours(73);
        assert!(!can_access(&snap, after_expiry));
        assert!(!can_access(&snap, after_expiry + Duration::days(365)));
    }

    #[test]
    fn submit_transitions_per_prior_cycle() {
        assert_eq!(submit_target(Status::InviteGenerated).unwrap(), Status::Submitted);
        assert_eq!(
            submit_target(Status::ModificationRequested).unwrap(),
            Status::Resubmitted
        );
        for status in [
            Status::Submitted,
            Status::Resubmitted,
            Status::Approved,
            Status::Terminated,
            Status::ManualPdfSent,
        ] {
            assert_matches!(submit_target(status), Err(CoreError::Forbidden(_)));
        }
    }

    #[test]
    fn review_actions_require_under_review_status() {
        for status in [Status::Submitted, Status::Resubmitted] {
            assert!(check_request_modification(status).is_ok());
            assert!(check_approve(status).is_ok());
        }
        for status in [
            Status::InviteGenerated,
            Status::ModificationRequested,
            Status::Approved,
            Status::Terminated,
            Status::ManualPdfSent,
        ] {
            assert_matches!(check_request_modification(status), Err(CoreError::Conflict(_)));
            assert_matches!(check_approve(status), Err(CoreError::Conflict(_)));
        }
    }

    // Terminate is permitted from any non-terminated state, including
    // before any employee interaction.
    #[test]
    fn terminate_allowed_from_any_nonterminal_state() {
        for status in [
            Status::InviteGenerated,
            Status::ModificationRequested,
            Status::Submitted,
            Status::Resubmitted,
            Status::Approved,
            Status::ManualPdfSent,
        ] {
            assert!(check_terminate(status).is_ok());
        }
        assert_matches!(check_terminate(Status::Terminated), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn status_roundtrips_through_storage_form() {
        for status in [
            Status::InviteGenerated,
            Status::ModificationRequested,
            Status::Submitted,
            Status::Resubmitted,
            Status::Approved,
            Status::Terminated,
            Status::ManualPdfSent,
        ] {
            assert_eq!(Status::parse(status.as_str()).unwrap(), status);
        }
        assert!(Status::parse("DRAFT").is_err());
    }

    #[test]
    fn initial_status_follows_method() {
        assert_eq!(initial_status(Method::Digital), Status::InviteGenerated);
        assert_eq!(initial_status(Method::Manual), Status::ManualPdfSent);
    }

    #[test]
    fn only_india_is_activated() {
        assert!(Subsidiary::India.is_activated());
        assert!(!Subsidiary::Canada.is_activated());
        assert!(!Subsidiary::Usa.is_activated());
    }
}
