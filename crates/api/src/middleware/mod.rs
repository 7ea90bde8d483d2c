//! Request guards: admin token extractor and employee session extractors.

pub mod admin;
pub mod employee;
