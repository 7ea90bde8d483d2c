//! Domain logic for the employee onboarding platform.
//!
//! This crate is pure: no I/O, no database, no HTTP. It holds the
//! onboarding lifecycle state machine, the access predicates derived from
//! it, the invite token / OTP / session-cookie utilities, the subsidiary
//! form payloads, and the shared error taxonomy. The `db` and `api` crates
//! build on top of these types.

pub mod audit;
pub mod cookie;
pub mod error;
pub mod forms;
pub mod onboarding;
pub mod otp;
pub mod pdf;
pub mod session;
pub mod token;
pub mod types;
