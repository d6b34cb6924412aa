use std::net::IpAddr;
use std::sync::Arc;

use authelia_config::StorageBackend;
use chrono::{DateTime, NaiveDateTime};

use super::error::DomainError;
use super::models::{
    Ban, BanRequest, BanTarget, NewBan, TotpConfiguration, TotpHistoryReport,
};
use super::repo::StorageRepository;
use crate::infra::storage::sea_orm_repo::SeaOrmStorageRepository;

pub const DEFAULT_HISTORY_LIMIT: u64 = 100;
pub const MAX_HISTORY_LIMIT: u64 = 10_000;

const DEFAULT_BAN_SOURCE: &str = "admin";

enum Backend {
    Missing,
    Unsupported(&'static str),
    Ready {
        kind: &'static str,
        repo: Arc<dyn StorageRepository>,
    },
}

/// Operations over Authelia's storage, independent of the backend in use.
pub struct StorageService {
    backend: Backend,
}

impl StorageService {
    /// Service over an explicit repository.
    #[must_use]
    pub fn new(kind: &'static str, repo: Arc<dyn StorageRepository>) -> Self {
        Self {
            backend: Backend::Ready { kind, repo },
        }
    }

    /// Service for the backend declared in Authelia's configuration.
    ///
    /// `SQLite` is opened lazily on first use; any other backend makes every
    /// operation fail with [`DomainError::UnsupportedBackend`].
    #[must_use]
    pub fn from_backend(backend: Option<&StorageBackend>) -> Self {
        let backend = match backend {
            None => Backend::Missing,
            Some(StorageBackend::Sqlite { path }) => Backend::Ready {
                kind: "sqlite",
                repo: Arc::new(SeaOrmStorageRepository::new(path.clone())),
            },
            Some(other @ StorageBackend::Postgres { address }) => {
                tracing::warn!(
                    backend = other.kind(),
                    %address,
                    "Storage backend has no adapter; storage routes will answer 501"
                );
                Backend::Unsupported(other.kind())
            }
        };
        Self { backend }
    }

    fn repo(&self) -> Result<&dyn StorageRepository, DomainError> {
        match &self.backend {
            Backend::Missing => Err(DomainError::NotConfigured),
            Backend::Unsupported(kind) => Err(DomainError::UnsupportedBackend(*kind)),
            Backend::Ready { repo, .. } => Ok(repo.as_ref()),
        }
    }

    /// Backend name, if one is configured.
    #[must_use]
    pub fn backend_kind(&self) -> Option<&'static str> {
        match &self.backend {
            Backend::Missing => None,
            Backend::Unsupported(kind) | Backend::Ready { kind, .. } => Some(*kind),
        }
    }

    /// TOTP registrations ordered by username.
    ///
    /// # Errors
    /// Returns the backend selection error or [`DomainError::Storage`].
    pub async fn list_totp_configurations(&self) -> Result<Vec<TotpConfiguration>, DomainError> {
        Ok(self.repo()?.list_totp_configurations().await?)
    }

    /// # Errors
    /// Returns [`DomainError::NotFound`] when no registration has this id.
    pub async fn delete_totp_configuration(&self, id: i64) -> Result<(), DomainError> {
        if self.repo()?.delete_totp_configuration(id).await? {
            tracing::info!(id, "Deleted TOTP configuration");
            Ok(())
        } else {
            Err(DomainError::NotFound("TOTP configuration not found"))
        }
    }

    /// Newest history entries. `limit` defaults to 100 and is clamped to
    /// `1..=10000`.
    ///
    /// # Errors
    /// Returns the backend selection error or [`DomainError::Storage`].
    pub async fn totp_history(&self, limit: Option<u64>) -> Result<TotpHistoryReport, DomainError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let entries = self.repo()?.totp_history(limit).await?;
        Ok(TotpHistoryReport::from_entries(entries))
    }

    /// Bans of one kind, newest first.
    ///
    /// # Errors
    /// Returns the backend selection error or [`DomainError::Storage`].
    pub async fn list_bans(&self, target: BanTarget) -> Result<Vec<Ban>, DomainError> {
        Ok(self.repo()?.list_bans(target).await?)
    }

    /// Validate and insert a ban.
    ///
    /// # Errors
    /// Returns [`DomainError::Validation`] for a missing target, a malformed IP
    /// address or an unparseable expiration date.
    pub async fn ban(&self, target: BanTarget, request: BanRequest) -> Result<Ban, DomainError> {
        let subject = validate_target(target, &request.target)?;
        let repo = self.repo()?;

        let expires = if request.permanent {
            None
        } else {
            match request.expires.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(parse_expiration(raw)?),
                _ => None,
            }
        };

        let ban = NewBan {
            target: subject,
            expires,
            source: non_blank(request.source).unwrap_or_else(|| DEFAULT_BAN_SOURCE.to_owned()),
            reason: non_blank(request.reason),
        };

        let stored = repo.insert_ban(target, ban).await?;
        tracing::info!(
            id = stored.id,
            target = ?target,
            subject = %stored.target,
            expires = ?stored.expires,
            "Ban created"
        );
        Ok(stored)
    }

    /// # Errors
    /// Returns [`DomainError::NotFound`] when no ban of this kind has this id.
    pub async fn unban(&self, target: BanTarget, id: i64) -> Result<(), DomainError> {
        if self.repo()?.delete_ban(target, id).await? {
            tracing::info!(id, target = ?target, "Ban removed");
            Ok(())
        } else {
            Err(DomainError::NotFound(target.not_found_message()))
        }
    }

    /// Run a trivial query against the backend.
    ///
    /// # Errors
    /// Returns the backend selection error or [`DomainError::Storage`].
    pub async fn health(&self) -> Result<&'static str, DomainError> {
        let kind = self.backend_kind().ok_or(DomainError::NotConfigured)?;
        self.repo()?.ping().await?;
        Ok(kind)
    }
}

fn validate_target(target: BanTarget, raw: &str) -> Result<String, DomainError> {
    let value = raw.trim();
    match target {
        BanTarget::User if value.is_empty() => Err(DomainError::validation("Username is required")),
        BanTarget::Ip if value.is_empty() => Err(DomainError::validation("IP address is required")),
        BanTarget::Ip => value
            .parse::<IpAddr>()
            .map(|ip| ip.to_string())
            .map_err(|_| DomainError::validation("Invalid IP address format")),
        BanTarget::User => Ok(value.to_owned()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Accepts RFC 3339 timestamps (converted to UTC) and the naive
/// `YYYY-MM-DDTHH:MM[:SS]` form, which is taken as UTC.
pub(crate) fn parse_expiration(raw: &str) -> Result<NaiveDateTime, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| DomainError::validation("Invalid expiration date"))
}
