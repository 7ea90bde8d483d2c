//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod audit_log_repo;
pub mod onboarding_repo;
pub mod pdf_job_repo;

pub use audit_log_repo::AuditLogRepo;
pub use onboarding_repo::OnboardingRepo;
pub use pdf_job_repo::PdfJobRepo;
