use crate::auth::admin::AdminAuthConfig;

/// Default invite validity window in hours.
const DEFAULT_INVITE_VALIDITY_HOURS: i64 = 72;

/// Server configuration loaded from environment variables.
///
/// All fields except the admin JWT secret have sensible defaults suitable
/// for local development. In production, override via environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL used in invite links (default: `http://localhost:5173`).
    pub base_url: String,
    /// How long a fresh invite stays valid, in hours (default: `72`).
    pub invite_validity_hours: i64,
    /// Base URL of the external PDF-generation collaborator, if configured.
    pub pdf_service_url: Option<String>,
    /// Admin token configuration (secret, expiry, allow-list).
    pub admin: AdminAuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `BASE_URL`              | `http://localhost:5173` |
    /// | `INVITE_VALIDITY_HOURS` | `72`                    |
    /// | `PDF_SERVICE_URL`       | — (disabled)            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let invite_validity_hours: i64 = std::env::var("INVITE_VALIDITY_HOURS")
            .unwrap_or_else(|_| DEFAULT_INVITE_VALIDITY_HOURS.to_string())
            .parse()
            .expect("INVITE_VALIDITY_HOURS must be a valid i64");

        let pdf_service_url = std::env::var("PDF_SERVICE_URL")
            .ok()
            .map(|u| u.trim_end_matches('/').to_string());

        let admin = AdminAuthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            base_url,
            invite_validity_hours,
            pdf_service_url,
            admin,
        }
    }
}
