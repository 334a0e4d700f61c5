//! Transaction risk evaluation: adaptive amount limits, location
//! correlation, blocklists, and reviewer feedback over a SQLite log.

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod locks;
pub mod store;
pub mod threshold;
pub mod transaction;
pub mod types;
pub mod validation;
pub mod verdict;
