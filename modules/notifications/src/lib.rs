//! Read-only view of the file written by Authelia's filesystem notifier.

pub mod api;
pub mod domain;

pub use domain::service::NotificationLog;
