//! Shared helpers for staging package contents.

pub mod fs;
