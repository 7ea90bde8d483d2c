//! Pure half of the session resolution guard.
//!
//! The API layer performs exactly one lookup (hash the presented token,
//! fetch the unique DIGITAL onboarding carrying that hash) and then hands
//! the resulting snapshot to [`evaluate_session`]. Keeping the decision
//! side-effect-free makes the guard deterministic to unit-test against
//! in-memory records.
//!
//! The cookie's validity window is fixed at issuance to the invite's
//! remaining lifetime; evaluation never extends it.

use crate::error::{CoreError, RevokedReason, SessionRequiredReason};
use crate::onboarding::{can_access, AccessSnapshot, Method, Status};
use crate::types::Timestamp;

/// Whether the caller needs write access to the onboarding.
///
/// Strict read-only enforcement is opt-in per call-site rather than
/// inferred from the route path, so endpoints cannot silently drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// The caller only reads; SUBMITTED/RESUBMITTED records resolve fine.
    ReadOnly,
    /// The caller mutates the form; records under review are rejected.
    ReadWrite,
}

/// Decide whether a matched onboarding record backs a usable session.
///
/// Mirrors the guard algorithm: expired/cleared invite fails
/// SESSION_REQUIRED, an access-revoking status fails UNAUTHORIZED, and in
/// [`SessionMode::ReadWrite`] an under-review status fails FORBIDDEN.
/// All failures instruct the HTTP boundary to clear the cookie except the
/// read-only rejection, where the session itself is still valid.
pub fn evaluate_session(
    snap: &AccessSnapshot,
    now: Timestamp,
    mode: SessionMode,
) -> Result<(), CoreError> {
    // The lookup is keyed on method = DIGITAL; re-check defensively.
    if snap.method != Method::Digital {
        return Err(CoreError::SessionRequired(SessionRequiredReason::NoMatch));
    }

    match snap.status {
        Status::Approved => return Err(CoreError::AccessRevoked(RevokedReason::Approved)),
        Status::Terminated => return Err(CoreError::AccessRevoked(RevokedReason::Terminated)),
        _ => {}
    }

    // Invite expiry strictly bounds access regardless of status.
    if !can_access(snap, now) {
        return Err(CoreError::SessionRequired(SessionRequiredReason::Expired));
    }

    if mode == SessionMode::ReadWrite && snap.status.is_under_review() {
        return Err(CoreError::Forbidden(
            "Onboarding is awaiting review and is read-only".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::{CoreError, RevokedReason, SessionRequiredReason};

    fn snap(status: Status, expires_in_hours: i64) -> AccessSnapshot {
        AccessSnapshot {
            method: Method::Digital,
            status,
            invite_expires_at: Some(Utc::now() + Duration::hours(expires_in_hours)),
        }
    }

    #[test]
    fn valid_session_resolves_in_both_modes() {
        let now = Utc::now();
        let s = snap(Status::InviteGenerated, 72);
        assert!(evaluate_session(&s, now, SessionMode::ReadOnly).is_ok());
        assert!(evaluate_session(&s, now, SessionMode::ReadWrite).is_ok());
    }

    // Idempotence: evaluating the same snapshot twice with no intervening
    // mutation yields the same outcome.
    #[test]
    fn evaluation_is_idempotent() {
        let now = Utc::now();
        let s = snap(Status::ModificationRequested, 24);
        let first = evaluate_session(&s, now, SessionMode::ReadOnly).is_ok();
        let second = evaluate_session(&s, now, SessionMode::ReadOnly).is_ok();
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn expired_invite_requires_new_session() {
        let now = Utc::now();
        let s = snap(Status::InviteGenerated, -1);
        assert_matches!(
            evaluate_session(&s, now, SessionMode::ReadOnly),
            Err(CoreError::SessionRequired(SessionRequiredReason::Expired))
        );
    }

    #[test]
    fn cleared_invite_requires_new_session() {
        let now = Utc::now();
        let s = AccessSnapshot {
            method: Method::Digital,
            status: Status::InviteGenerated,
            invite_expires_at: None,
        };
        assert_matches!(
            evaluate_session(&s, now, SessionMode::ReadOnly),
            Err(CoreError::SessionRequired(SessionRequiredReason::Expired))
        );
    }

    // After approval the original cookie resolves to UNAUTHORIZED with
    // reason APPROVED, even with the invite intact.
    #[test]
    fn approved_status_revokes_with_reason() {
        let now = Utc::now();
        let s = snap(Status::Approved, 24);
        assert_matches!(
            evaluate_session(&s, now, SessionMode::ReadOnly),
            Err(CoreError::AccessRevoked(RevokedReason::Approved))
        );
    }

    #[test]
    fn terminated_status_revokes_with_reason() {
        let now = Utc::now();
        let s = snap(Status::Terminated, 24);
        assert_matches!(
            evaluate_session(&s, now, SessionMode::ReadWrite),
            Err(CoreError::AccessRevoked(RevokedReason::Terminated))
        );
    }

    // Under-review records are readable but not writable; a modification
    // request restores write access with the same cookie.
    #[test]
    fn strict_mode_rejects_under_review_only() {
        let now = Utc::now();
        for status in [Status::Submitted, Status::Resubmitted] {
            let s = snap(status, 24);
            assert!(evaluate_session(&s, now, SessionMode::ReadOnly).is_ok());
            assert_matches!(
                evaluate_session(&s, now, SessionMode::ReadWrite),
                Err(CoreError::Forbidden(_))
            );
        }
        let back_to_edit = snap(Status::ModificationRequested, 24);
        assert!(evaluate_session(&back_to_edit, now, SessionMode::ReadWrite).is_ok());
    }

    #[test]
    fn manual_records_never_resolve() {
        let now = Utc::now();
        let s = AccessSnapshot {
            method: Method::Manual,
            status: Status::ManualPdfSent,
            invite_expires_at: None,
        };
        assert_matches!(
            evaluate_session(&s, now, SessionMode::ReadOnly),
            Err(CoreError::SessionRequired(SessionRequiredReason::NoMatch))
        );
    }
}
