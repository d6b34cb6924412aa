//! HTTP host of the admin console.
//!
//! Owns the middleware stack every request passes through:
//! set request id -> propagate request id -> trace -> push request id to extensions
//! -> timeout -> body limit -> origin check -> session gate -> router

pub mod auth;
pub mod config;
pub mod csrf;
pub mod middleware;
pub mod module;
pub mod web;

pub use config::ApiGatewayConfig;
pub use module::ApiGateway;
