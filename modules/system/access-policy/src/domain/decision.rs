use console_security::Identity;

/// Externally visible denial category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    NotAuthenticated,
    NotAuthorized,
}

/// Why a request was denied; logged distinctly, rejected identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session, anonymous session, or the provider rejected it.
    NotAuthenticated,
    /// The provider answered 200 with an unexpected body.
    MalformedUpstreamResponse,
    /// The provider could not be consulted.
    UpstreamUnavailable,
    /// Authenticated, but not on the allow-list.
    NotAuthorized,
    /// Allow-listed, but below the minimum authentication level.
    InsufficientFactor,
}

impl DenyReason {
    #[must_use]
    pub fn kind(self) -> DenialKind {
        match self {
            Self::NotAuthenticated | Self::MalformedUpstreamResponse | Self::UpstreamUnavailable => {
                DenialKind::NotAuthenticated
            }
            Self::NotAuthorized | Self::InsufficientFactor => DenialKind::NotAuthorized,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::MalformedUpstreamResponse => "malformed_upstream_response",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::NotAuthorized => "not_authorized",
            Self::InsufficientFactor => "insufficient_factor",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`crate::AccessPolicy::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(Identity),
    Deny(DenyReason),
}
