//! Filesystem helpers

pub mod artifacts;
pub mod dir;
pub mod file;
