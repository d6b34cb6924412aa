//! Allow-list and factor-level evaluation.

use std::collections::HashSet;

use console_security::Identity;
use console_security::constants::MIN_AUTHENTICATION_LEVEL;
use session_verifier_sdk::{UnauthenticatedReason, VerificationResult};

use super::decision::{Decision, DenyReason};
use crate::config::AccessPolicyConfig;

/// Process-wide authorization policy.
///
/// Built once at startup and read concurrently afterwards; `evaluate` has no
/// side effects.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    allowed_users: HashSet<String>,
    min_level: i64,
}

impl AccessPolicy {
    /// Create a policy from configuration.
    ///
    /// Entries are trimmed and empty ones dropped; an empty list denies everyone.
    #[must_use]
    pub fn from_config(cfg: &AccessPolicyConfig) -> Self {
        let allowed_users = cfg
            .allowed_users
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_owned)
            .collect();

        Self {
            allowed_users,
            min_level: MIN_AUTHENTICATION_LEVEL,
        }
    }

    #[must_use]
    pub fn allows_user(&self, username: &str) -> bool {
        self.allowed_users.contains(username)
    }

    /// Sorted allow-list, for diagnostics.
    #[must_use]
    pub fn allowed_users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.allowed_users.iter().map(String::as_str).collect();
        users.sort_unstable();
        users
    }

    /// Decide whether the verified session may use the console.
    #[must_use]
    pub fn evaluate(&self, result: &VerificationResult) -> Decision {
        let state = match result {
            VerificationResult::Authenticated(state) => state,
            VerificationResult::Unauthenticated(UnauthenticatedReason::MalformedResponse) => {
                return Decision::Deny(DenyReason::MalformedUpstreamResponse);
            }
            VerificationResult::Unauthenticated(_) => {
                return Decision::Deny(DenyReason::NotAuthenticated);
            }
            VerificationResult::Error(_) => return Decision::Deny(DenyReason::UpstreamUnavailable),
        };

        if !self.allows_user(&state.username) {
            return Decision::Deny(DenyReason::NotAuthorized);
        }
        if state.authentication_level < self.min_level {
            return Decision::Deny(DenyReason::InsufficientFactor);
        }

        Decision::Allow(Identity::new(
            state.username.clone(),
            state.authentication_level,
        ))
    }
}
