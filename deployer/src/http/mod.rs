//! Management console REST client

pub mod api;
pub mod catalog;
pub mod client;
pub mod deployments;
pub mod repository;
