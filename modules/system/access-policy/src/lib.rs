//! Access policy for the admin console.
//!
//! A pure decision function over a [`session_verifier_sdk::VerificationResult`]:
//! the caller must be authenticated, on the allow-list and at or above the
//! minimum authentication level.

pub mod config;
pub mod domain;

pub use config::AccessPolicyConfig;
pub use domain::decision::{Decision, DenialKind, DenyReason};
pub use domain::policy::AccessPolicy;
