pub mod banned_ip;
pub mod banned_user;
pub mod totp_configuration;
pub mod totp_history;
