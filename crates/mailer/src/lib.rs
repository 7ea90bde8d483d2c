//! Email collaborator for the onboarding platform.
//!
//! Wraps the `lettre` async SMTP transport behind a small message model
//! (`{from, to[], subject, html, attachments}`). Configuration is loaded
//! from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use base64::Engine;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub mod templates;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "people-ops@newhire.local";

/// Configuration for the SMTP email collaborator.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                      |
    /// |-----------------|----------|------------------------------|
    /// | `SMTP_HOST`     | yes      | —                            |
    /// | `SMTP_PORT`     | no       | `587`                        |
    /// | `SMTP_FROM`     | no       | `people-ops@newhire.local`   |
    /// | `SMTP_USER`     | no       | —                            |
    /// | `SMTP_PASSWORD` | no       | —                            |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Message model
// ---------------------------------------------------------------------------

/// A file attached to an outgoing email, content base64-encoded.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub name: String,
    pub content_type: String,
    pub base64: String,
}

/// An outgoing email. The sender is taken from [`EmailConfig`].
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<EmailAttachment>,
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends onboarding notices via SMTP.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send an email, assembling an HTML body plus any attachments.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if message.to.is_empty() {
            return Err(EmailError::Build("No recipients".to_string()));
        }

        let mut builder = Message::builder()
            .from(self.config.from_address.parse()?)
            .subject(&message.subject);
        for recipient in &message.to {
            builder = builder.to(recipient.parse()?);
        }

        let mut body = MultiPart::mixed().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(message.html.clone()),
        );
        for attachment in &message.attachments {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&attachment.base64)
                .map_err(|e| {
                    EmailError::Build(format!("Invalid base64 in attachment '{}': {e}", attachment.name))
                })?;
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                EmailError::Build(format!(
                    "Invalid content type '{}': {e}",
                    attachment.content_type
                ))
            })?;
            body = body.singlepart(Attachment::new(attachment.name.clone()).body(bytes, content_type));
        }

        let email = builder
            .multipart(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Onboarding email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
