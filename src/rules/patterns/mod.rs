//! Text heuristics used by the check groups
//!
//! These are deliberately not parsers. Markdown headings and Bicep resources
//! are recognized by line scans and regexes, which is good enough for the
//! governance checks and keeps the engine free of parser dependencies. The
//! narrow functions here are the swap point if a real parser is ever needed.

pub mod auth;
pub mod markdown;
