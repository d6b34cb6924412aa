//! Configuration for the access policy.

use serde::{Deserialize, Serialize};

fn default_allowed_users() -> Vec<String> {
    vec!["admin".to_owned()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessPolicyConfig {
    /// Usernames permitted to use the console.
    #[serde(default = "default_allowed_users")]
    pub allowed_users: Vec<String>,
}

impl Default for AccessPolicyConfig {
    fn default() -> Self {
        Self {
            allowed_users: default_allowed_users(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_admin_only() {
        assert_eq!(AccessPolicyConfig::default().allowed_users, vec!["admin"]);
    }

    #[test]
    fn missing_list_falls_back_to_default() {
        let cfg: AccessPolicyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.allowed_users, vec!["admin"]);
    }
}
