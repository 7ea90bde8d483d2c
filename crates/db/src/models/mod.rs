//! Row types and DTOs for the persistence layer.

pub mod audit;
pub mod onboarding;
pub mod pdf_job;
