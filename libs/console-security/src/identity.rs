use serde::Serialize;

/// `Identity` is the authenticated and authorized caller of a single request.
///
/// Built by the session gate after the identity provider confirmed the session
/// and the access policy accepted it. It is inserted into the request
/// extensions and never outlives that request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    username: String,
    authentication_level: i64,
}

impl Identity {
    #[must_use]
    pub fn new(username: impl Into<String>, authentication_level: i64) -> Self {
        Self {
            username: username.into(),
            authentication_level,
        }
    }

    /// Username reported by the identity provider.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Factor strength of the session (0 = none, 1 = one factor, 2 = two factors).
    #[must_use]
    pub fn authentication_level(&self) -> i64 {
        self.authentication_level
    }
}
