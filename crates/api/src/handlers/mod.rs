//! HTTP request handlers, grouped by surface.

pub mod admin_auth;
pub mod admin_onboarding;
pub mod audit;
pub mod employee_onboarding;
pub mod pdf_jobs;
