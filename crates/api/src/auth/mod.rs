//! Admin authentication.

pub mod admin;
