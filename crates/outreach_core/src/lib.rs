//! Shared prospect-outreach domain primitives.
//!
//! This crate owns the customer record model, the change-stream and hosted
//! model contracts, and prompt construction. It intentionally excludes AWS SDK
//! and Lambda runtime concerns; those live in `outreach_aws`.

pub mod config;
pub mod prompt;
pub mod record;
pub mod stream;
