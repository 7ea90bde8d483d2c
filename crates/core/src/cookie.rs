//! Employee session cookie codec.
//!
//! The session cookie carries the raw invite token (never the hash). Its
//! Max-Age is fixed at issuance to the invite's remaining lifetime, so the
//! cookie cannot outlive the invite; there is no sliding-window renewal.
//! Resending the invite is the only way to extend a session.

use crate::error::{CoreError, SessionRequiredReason};
use crate::types::Timestamp;

/// Name of the employee session cookie.
///
/// Distinct from whatever cookie the admin identity provider uses.
pub const SESSION_COOKIE_NAME: &str = "nh_session";

/// Build a `Set-Cookie` value carrying the raw token.
///
/// Attributes: HttpOnly, Secure, SameSite=Lax, Path=/. `max_age_secs` is
/// clamped at 0; callers should have validated the remaining lifetime via
/// [`remaining_max_age`] first.
pub fn issue(raw_token: &str, max_age_secs: i64) -> String {
    let max_age = max_age_secs.max(0);
    format!(
        "{SESSION_COOKIE_NAME}={raw_token}; Max-Age={max_age}; Path=/; HttpOnly; Secure; SameSite=Lax"
    )
}

/// Build a `Set-Cookie` value that clears the session cookie.
pub fn clear() -> String {
    format!("{SESSION_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=Lax")
}

/// Seconds of invite lifetime remaining at `now`, floored to whole seconds.
///
/// Fails with an invite-expired session error when the remainder is zero
/// or negative, rather than letting a caller issue a cookie that silently
/// never authenticates.
pub fn remaining_max_age(expires_at: Timestamp, now: Timestamp) -> Result<i64, CoreError> {
    let secs = (expires_at - now).num_seconds();
    if secs <= 0 {
        return Err(CoreError::SessionRequired(SessionRequiredReason::Expired));
    }
    Ok(secs)
}

/// Extract a named cookie value from a raw `Cookie` request header.
pub fn extract_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Extract the employee session cookie value from a raw `Cookie` header.
pub fn extract_session_cookie(cookie_header: &str) -> Option<String> {
    extract_cookie(cookie_header, SESSION_COOKIE_NAME)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::{CoreError, SessionRequiredReason};

    #[test]
    fn issue_carries_required_attributes() {
        let header = issue("deadbeef", 3600);
        assert!(header.starts_with("nh_session=deadbeef; Max-Age=3600; "));
        assert!(header.contains("Path=/"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
    }

    #[test]
    fn clear_zeroes_max_age() {
        let header = clear();
        assert!(header.starts_with("nh_session=; Max-Age=0; "));
        assert!(header.contains("HttpOnly"));
    }

    #[test]
    fn remaining_max_age_floors_to_seconds() {
        let now = Utc::now();
        let expires = now + Duration::seconds(90) + Duration::milliseconds(700);
        assert_eq!(remaining_max_age(expires, now).unwrap(), 90);
    }

    #[test]
    fn expired_invite_fails_instead_of_issuing() {
        let now = Utc::now();
        assert_matches!(
            remaining_max_age(now, now),
            Err(CoreError::SessionRequired(SessionRequiredReason::Expired))
        );
        assert_matches!(
            remaining_max_age(now - Duration::hours(1), now),
            Err(CoreError::SessionRequired(SessionRequiredReason::Expired))
        );
    }

    #[test]
    fn extracts_cookie_from_header() {
        let header = "theme=dark; nh_session=abc123; other=1";
        assert_eq!(extract_session_cookie(header).as_deref(), Some("abc123"));
        assert_eq!(extract_session_cookie("theme=dark"), None);
    }
}
