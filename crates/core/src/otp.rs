//! One-time passcode verification for session establishment.
//!
//! After a valid invite token is presented, a single six-digit OTP is
//! generated, hashed with the same digest as invite tokens, and emailed.
//! The OTP is time-bounded and attempt-limited; it is consumed on success
//! and undefined once a session is active or the onboarding terminated.

use rand::Rng;

use crate::error::CoreError;
use crate::token::verify_token;
use crate::types::Timestamp;

/// OTP lifetime in minutes.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Failed attempts after which the OTP is invalidated.
pub const OTP_MAX_ATTEMPTS: i32 = 5;

/// Generate a six-digit zero-padded numeric OTP.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

/// Outcome of an OTP check; tells the caller how to mutate stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    /// Correct code: clear the OTP and establish the session.
    Accepted,
    /// Wrong code: increment the attempt counter and report failure.
    Rejected,
    /// Wrong code and the attempt budget is now spent: clear the OTP;
    /// the employee must restart from verify-invite.
    RejectedAndExhausted,
}

/// Check a presented code against the stored OTP state.
///
/// `attempts` is the number of failures already recorded. Absent or
/// expired OTPs fail before the code is even compared.
pub fn check_otp(
    stored_hash: Option<&str>,
    expires_at: Option<Timestamp>,
    attempts: i32,
    presented: &str,
    now: Timestamp,
) -> Result<OtpCheck, CoreError> {
    let hash = stored_hash.ok_or_else(|| {
        CoreError::Validation("No active verification code; verify the invite first".to_string())
    })?;

    match expires_at {
        Some(exp) if exp > now => {}
        _ => {
            return Err(CoreError::Validation(
                "Verification code expired; verify the invite again".to_string(),
            ))
        }
    }

    if attempts >= OTP_MAX_ATTEMPTS {
        return Err(CoreError::Unauthorized(
            "Too many incorrect attempts; verify the invite again".to_string(),
        ));
    }

    if verify_token(presented, hash) {
        Ok(OtpCheck::Accepted)
    } else if attempts + 1 >= OTP_MAX_ATTEMPTS {
        Ok(OtpCheck::RejectedAndExhausted)
    } else {
        Ok(OtpCheck::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::token::hash_token;

    #[test]
    fn generated_otp_is_six_digits() {
        for _ in 0..20 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn correct_code_is_accepted() {
        let now = Utc::now();
        let hash = hash_token("123456");
        let result = check_otp(Some(&hash), Some(now + Duration::minutes(5)), 0, "123456", now);
        assert_matches!(result, Ok(OtpCheck::Accepted));
    }

    #[test]
    fn wrong_code_is_rejected_then_exhausted() {
        let now = Utc::now();
        let hash = hash_token("123456");
        let exp = Some(now + Duration::minutes(5));

        assert_matches!(
            check_otp(Some(&hash), exp, 0, "000000", now),
            Ok(OtpCheck::Rejected)
        );
        // Fifth failure spends the budget.
        assert_matches!(
            check_otp(Some(&hash), exp, OTP_MAX_ATTEMPTS - 1, "000000", now),
            Ok(OtpCheck::RejectedAndExhausted)
        );
        // Once exhausted even the correct code is refused.
        assert_matches!(
            check_otp(Some(&hash), exp, OTP_MAX_ATTEMPTS, "123456", now),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn absent_or_expired_otp_fails_validation() {
        let now = Utc::now();
        let hash = hash_token("123456");
        assert_matches!(
            check_otp(None, None, 0, "123456", now),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            check_otp(Some(&hash), Some(now - Duration::minutes(1)), 0, "123456", now),
            Err(CoreError::Validation(_))
        );
    }
}
