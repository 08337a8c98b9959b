//! Domain types for influencers, claims, papers and research runs.

pub mod claim;
pub mod config;
pub mod dates;
pub mod ids;
pub mod influencer;
pub mod paper;
pub mod run;
pub mod scoring;
