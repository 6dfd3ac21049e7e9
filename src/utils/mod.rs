//! Shared utilities

pub mod gh;
