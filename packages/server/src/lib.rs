// Health Claim Research - API Core
//
// This crate exposes the research service over HTTP: starting research runs
// (bulk, single influencer, single claim) and reading influencers with their
// scored claims.

pub mod config;
pub mod server;

pub use config::*;
