//! Data Transfer Objects for the processing service API
//!
//! Wire shapes exchanged with the server. Conversion into domain types
//! happens here so the rest of the workspace never sees raw payloads.

pub mod action;
pub mod status;
