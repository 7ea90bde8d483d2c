//! Builders for the onboarding notice emails.
//!
//! Templates are deliberately plain HTML strings; rendering sophistication
//! lives outside this service.

use newhire_core::types::Timestamp;

use crate::{EmailAttachment, EmailMessage};

/// Invite email for a DIGITAL onboarding. The link carries the raw token.
pub fn invite(
    to: &str,
    first_name: &str,
    base_url: &str,
    raw_token: &str,
    expires_at: Timestamp,
) -> EmailMessage {
    let link = format!("{base_url}/onboarding?token={raw_token}");
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Welcome aboard — complete your onboarding".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Please complete your onboarding details using the link below. \
             The link is valid until {}.</p>\
             <p><a href=\"{link}\">Start onboarding</a></p>",
            expires_at.format("%d %b %Y %H:%M UTC")
        ),
        attachments: Vec::new(),
    }
}

/// One-time passcode for session establishment.
pub fn otp(to: &str, first_name: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Your onboarding verification code".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Your verification code is <strong>{code}</strong>. \
             It expires in 10 minutes.</p>"
        ),
        attachments: Vec::new(),
    }
}

/// Blank-form email for a MANUAL onboarding, with the PDF attached.
pub fn manual_form(
    to: &str,
    first_name: &str,
    subsidiary: &str,
    form_pdf: EmailAttachment,
) -> EmailMessage {
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Your onboarding forms".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Attached are the onboarding forms for {subsidiary}. \
             Please fill them in and return them to People Ops.</p>"
        ),
        attachments: vec![form_pdf],
    }
}

/// Notice that HR requested changes to a submission.
pub fn modification_requested(to: &str, first_name: &str, message: &str) -> EmailMessage {
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Your onboarding needs changes".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>People Ops reviewed your submission and requested changes:</p>\
             <blockquote>{message}</blockquote>\
             <p>Your existing link will let you edit and resubmit.</p>"
        ),
        attachments: Vec::new(),
    }
}

/// Notice that the submission was approved.
pub fn approved(to: &str, first_name: &str) -> EmailMessage {
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Your onboarding is complete".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Your onboarding details have been approved. \
             Nothing further is needed from you.</p>"
        ),
        attachments: Vec::new(),
    }
}

/// Termination notice.
pub fn terminated(to: &str, first_name: &str) -> EmailMessage {
    EmailMessage {
        to: vec![to.to_string()],
        subject: "Your onboarding has been closed".to_string(),
        html: format!(
            "<p>Hi {first_name},</p>\
             <p>Your onboarding has been closed and your access link is no \
             longer valid. Contact People Ops with any questions.</p>"
        ),
        attachments: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn invite_link_carries_raw_token() {
        let message = invite(
            "a@example.com",
            "Asha",
            "https://onboarding.example.com",
            "rawtoken123",
            Utc::now(),
        );
        assert!(message.html.contains("/onboarding?token=rawtoken123"));
        assert_eq!(message.to, vec!["a@example.com"]);
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn manual_form_attaches_pdf() {
        let message = manual_form(
            "a@example.com",
            "Asha",
            "INDIA",
            EmailAttachment {
                name: "onboarding-forms.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                base64: "JVBERi0=".to_string(),
            },
        );
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].name, "onboarding-forms.pdf");
    }
}
