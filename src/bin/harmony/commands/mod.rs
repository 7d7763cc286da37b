//! Command implementations

pub mod apply;
pub mod clean;
pub mod completions;
pub mod resolve;
