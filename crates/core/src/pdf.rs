//! Status model for the external PDF-generation collaborator.
//!
//! PDF rendering runs out of process under an asynchronous job model keyed
//! by a generated job id. The PENDING status row is written *before* the
//! job is dispatched so polling never observes an unknown id for a job
//! that was accepted. The core only records job state; it does not retry.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a PDF generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PdfJobState {
    Pending,
    Running,
    Done,
    Error,
}

impl PdfJobState {
    pub fn as_str(self) -> &'static str {
        match self {
            PdfJobState::Pending => "PENDING",
            PdfJobState::Running => "RUNNING",
            PdfJobState::Done => "DONE",
            PdfJobState::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "PENDING" => Ok(PdfJobState::Pending),
            "RUNNING" => Ok(PdfJobState::Running),
            "DONE" => Ok(PdfJobState::Done),
            "ERROR" => Ok(PdfJobState::Error),
            other => Err(CoreError::Internal(format!(
                "Unknown PDF job state '{other}' in storage"
            ))),
        }
    }

    /// Terminal states stop being updated by collaborator callbacks.
    pub fn is_terminal(self) -> bool {
        matches!(self, PdfJobState::Done | PdfJobState::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_roundtrips_through_storage_form() {
        for state in [
            PdfJobState::Pending,
            PdfJobState::Running,
            PdfJobState::Done,
            PdfJobState::Error,
        ] {
            assert_eq!(PdfJobState::parse(state.as_str()).unwrap(), state);
        }
        assert!(PdfJobState::parse("QUEUED").is_err());
    }

    #[test]
    fn only_done_and_error_are_terminal() {
        assert!(!PdfJobState::Pending.is_terminal());
        assert!(!PdfJobState::Running.is_terminal());
        assert!(PdfJobState::Done.is_terminal());
        assert!(PdfJobState::Error.is_terminal());
    }
}
