//! Mule Management Console API models
//!
//! Request and response bodies exchanged with the console's REST API.

pub mod models;

pub use models::*;
