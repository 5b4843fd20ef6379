//! Core business logic for traversee.
//!
//! Services sit between the HTTP handlers and the repositories: they apply
//! listing filters, enforce ownership and uniqueness rules, and serialize
//! rows into response views enriched with identity-provider profiles.

pub mod services;

pub use services::*;
