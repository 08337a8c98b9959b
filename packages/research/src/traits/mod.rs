//! Core trait abstractions for the research library.
//!
//! Applications implement these to provide the answer service and storage.

pub mod answer;
pub mod store;
