//! Session Verifier SDK
//!
//! This crate provides the public API for session verification:
//!
//! - [`SessionVerifier`] - Trait implemented by identity-provider adapters
//! - [`SessionCredentials`] - What the gate extracted from the inbound request
//! - [`VerificationResult`] - Typed outcome of one verification
//! - [`VerifierError`] - Transport-level failures
//!
//! ## Usage
//!
//! The gate holds the verifier behind an `Arc<dyn SessionVerifier>`:
//!
//! ```ignore
//! use session_verifier_sdk::{SessionCredentials, SessionVerifier};
//!
//! let credentials = SessionCredentials::new(token, cookie_header);
//! let result = verifier.verify(&credentials).await;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::SessionVerifier;
pub use error::VerifierError;
pub use models::{SessionCredentials, SessionState, UnauthenticatedReason, VerificationResult};
