//! Deployment module

pub mod lifecycle;
pub mod orchestrator;
pub mod poller;
pub mod resolver;
