//! AWS-oriented adapters and handlers for prospect intake and enrichment.
//!
//! This crate owns runtime integration details (the operator console, the
//! Lambda stream handler, DynamoDB and Bedrock adapters). Deterministic
//! record, stream and prompt contracts come from `outreach_core`.

pub mod adapters;
pub mod handlers;
pub mod telemetry;
