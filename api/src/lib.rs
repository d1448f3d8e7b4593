//! HTTP boundary for Authkeep
//!
//! Library exports so the integration tests can build the same app as the
//! binary.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
