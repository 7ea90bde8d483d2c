//! Onboarding API server library.
//!
//! Exposes the core building blocks (config, state, error handling,
//! routes, policy engine, audit sink) so integration tests and the binary
//! entrypoint can both access them.

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pdf;
pub mod policy;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
