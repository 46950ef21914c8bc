//! CLI command implementations

pub mod check;
pub mod index;
pub mod search;
pub mod sessions;
pub mod show;
pub mod stats;
