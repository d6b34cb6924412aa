//! Authelia session verifier.
//!
//! Implements [`session_verifier_sdk::SessionVerifier`] by asking Authelia's
//! `/api/state` endpoint about the caller's session.

pub mod config;
pub mod domain;

pub use config::AutheliaVerifierConfig;
pub use domain::client::AutheliaVerifier;
