//! MMC Deployer Library
//!
//! Uploads application archives to a Mule Management Console repository
//! and drives the resulting deployments onto servers, server groups and
//! clusters.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod utils;
