//! Well-known names shared between the gate and its collaborators.

/// Name of the session cookie issued by Authelia.
pub const DEFAULT_SESSION_COOKIE: &str = "authelia_session";

/// Lowest `authentication_level` accepted for console access (single factor).
pub const MIN_AUTHENTICATION_LEVEL: i64 = 1;
