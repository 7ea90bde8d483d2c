//! Admin token validation.
//!
//! The admin authentication provider is external: it issues HS256-signed
//! tokens carrying a verified `{email, name}` identity, signed with a
//! secret this service shares. This module validates those tokens and
//! checks the embedded email against a process-wide allow-list loaded
//! once at startup. Allow-list membership is case-insensitive and never
//! mutated at runtime.

use std::collections::HashSet;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the admin auth cookie. Independent from the employee session
/// cookie; the two identities are resolved separately.
pub const ADMIN_COOKIE_NAME: &str = "nh_admin";

/// Claims embedded in every admin token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    /// Subject -- the admin's verified email address.
    pub sub: String,
    /// Display name as asserted by the identity provider.
    pub name: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Default admin token lifetime in hours.
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 8;

/// Configuration for admin token validation and the admin allow-list.
#[derive(Debug, Clone)]
pub struct AdminAuthConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Token lifetime in hours (used when minting tokens in tests/tools).
    pub token_expiry_hours: i64,
    /// Lower-cased emails permitted to use the admin surface.
    allowed_emails: HashSet<String>,
}

impl AdminAuthConfig {
    /// Load admin auth configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `ADMIN_JWT_SECRET`        | **yes**  | --      |
    /// | `ADMIN_TOKEN_EXPIRY_HOURS`| no       | `8`     |
    /// | `ADMIN_EMAILS`            | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `ADMIN_JWT_SECRET` is unset/empty or `ADMIN_EMAILS`
    /// yields no addresses; misconfiguration must fail at startup, not
    /// per-request.
    pub fn from_env() -> Self {
        let secret = std::env::var("ADMIN_JWT_SECRET")
            .expect("ADMIN_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "ADMIN_JWT_SECRET must not be empty");

        let token_expiry_hours: i64 = std::env::var("ADMIN_TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_HOURS.to_string())
            .parse()
            .expect("ADMIN_TOKEN_EXPIRY_HOURS must be a valid i64");

        let allowed_emails = parse_allow_list(
            &std::env::var("ADMIN_EMAILS").expect("ADMIN_EMAILS must be set in the environment"),
        );
        assert!(
            !allowed_emails.is_empty(),
            "ADMIN_EMAILS must contain at least one address"
        );

        Self {
            secret,
            token_expiry_hours,
            allowed_emails,
        }
    }

    /// Build a config directly (tests and tooling).
    pub fn new(secret: impl Into<String>, emails: &[&str]) -> Self {
        Self {
            secret: secret.into(),
            token_expiry_hours: DEFAULT_TOKEN_EXPIRY_HOURS,
            allowed_emails: emails.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Case-insensitive allow-list membership.
    pub fn is_allowed(&self, email: &str) -> bool {
        self.allowed_emails.contains(&email.to_lowercase())
    }
}

fn parse_allow_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Mint an admin token (used by tests and by operator tooling standing in
/// for the identity provider).
pub fn generate_admin_token(
    email: &str,
    name: &str,
    config: &AdminAuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AdminClaims {
        sub: email.to_string(),
        name: name.to_string(),
        exp: now + config.token_expiry_hours * 3600,
        iat: now,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an admin token, returning the embedded claims.
///
/// Signature and expiry are checked here; allow-list membership is
/// checked by the caller so it can distinguish "bad token" from "valid
/// token, unknown admin".
pub fn validate_admin_token(
    token: &str,
    config: &AdminAuthConfig,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AdminAuthConfig {
        AdminAuthConfig::new(
            "test-secret-that-is-long-enough-for-hmac",
            &["HR@Example.com", "ops@example.com"],
        )
    }

    #[test]
    fn generate_and_validate_roundtrip() {
        let config = test_config();
        let token = generate_admin_token("hr@example.com", "HR Admin", &config)
            .expect("token generation should succeed");
        let claims = validate_admin_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, "hr@example.com");
        assert_eq!(claims.name, "HR Admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let config = test_config();
        assert!(config.is_allowed("hr@example.com"));
        assert!(config.is_allowed("HR@EXAMPLE.COM"));
        assert!(!config.is_allowed("intruder@example.com"));
    }

    #[test]
    fn token_signed_with_other_secret_fails() {
        let config_a = test_config();
        let config_b = AdminAuthConfig::new("a-completely-different-secret", &["hr@example.com"]);
        let token = generate_admin_token("hr@example.com", "HR", &config_a).unwrap();
        assert!(validate_admin_token(&token, &config_b).is_err());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Expired well past jsonwebtoken's default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = AdminClaims {
            sub: "hr@example.com".to_string(),
            name: "HR".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_admin_token(&token, &config).is_err());
    }
}
