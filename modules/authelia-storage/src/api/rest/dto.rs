use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::{
    Ban, BanRequest, TotpConfiguration, TotpHistoryEntry, TotpHistoryReport, TotpHistoryStats,
};

/// Placeholder reported instead of the TOTP secret.
pub const REDACTED_SECRET: &str = "[ENCRYPTED]";

#[derive(Debug, Clone, Serialize)]
pub struct TotpConfigurationDto {
    pub id: i64,
    pub created_at: String,
    pub last_used_at: Option<String>,
    pub username: String,
    pub issuer: Option<String>,
    pub algorithm: String,
    pub digits: i64,
    pub period: i64,
    pub secret: &'static str,
}

impl From<TotpConfiguration> for TotpConfigurationDto {
    fn from(c: TotpConfiguration) -> Self {
        Self {
            id: c.id,
            created_at: c.created_at,
            last_used_at: c.last_used_at,
            username: c.username,
            issuer: c.issuer,
            algorithm: c.algorithm,
            digits: c.digits,
            period: c.period,
            secret: REDACTED_SECRET,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotpConfigurationListDto {
    pub configurations: Vec<TotpConfigurationDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotpHistoryEntryDto {
    pub id: i64,
    pub created_at: String,
    pub username: String,
    pub step: String,
}

impl From<TotpHistoryEntry> for TotpHistoryEntryDto {
    fn from(e: TotpHistoryEntry) -> Self {
        Self {
            id: e.id,
            created_at: e.created_at,
            username: e.username,
            step: e.step,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotpHistoryStatsDto {
    pub total_entries: usize,
    pub unique_users: usize,
    pub most_recent_use: Option<String>,
    pub oldest_entry: Option<String>,
}

impl From<TotpHistoryStats> for TotpHistoryStatsDto {
    fn from(s: TotpHistoryStats) -> Self {
        Self {
            total_entries: s.total_entries,
            unique_users: s.unique_users,
            most_recent_use: s.most_recent_use,
            oldest_entry: s.oldest_entry,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotpHistoryDto {
    pub history: Vec<TotpHistoryEntryDto>,
    pub grouped_by_user: BTreeMap<String, Vec<TotpHistoryEntryDto>>,
    pub stats: TotpHistoryStatsDto,
}

impl From<TotpHistoryReport> for TotpHistoryDto {
    fn from(r: TotpHistoryReport) -> Self {
        Self {
            history: r.entries.into_iter().map(Into::into).collect(),
            grouped_by_user: r
                .grouped_by_user
                .into_iter()
                .map(|(user, entries)| (user, entries.into_iter().map(Into::into).collect()))
                .collect(),
            stats: r.stats.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannedUserDto {
    pub id: i64,
    pub time: String,
    pub expires: Option<String>,
    pub expired: Option<String>,
    pub revoked: bool,
    pub username: String,
    pub source: String,
    pub reason: Option<String>,
}

impl From<Ban> for BannedUserDto {
    fn from(b: Ban) -> Self {
        Self {
            id: b.id,
            time: b.time,
            expires: b.expires,
            expired: b.expired,
            revoked: b.revoked,
            username: b.target,
            source: b.source,
            reason: b.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BannedIpDto {
    pub id: i64,
    pub time: String,
    pub expires: Option<String>,
    pub expired: Option<String>,
    pub revoked: bool,
    pub ip: String,
    pub source: String,
    pub reason: Option<String>,
}

impl From<Ban> for BannedIpDto {
    fn from(b: Ban) -> Self {
        Self {
            id: b.id,
            time: b.time,
            expires: b.expires,
            expired: b.expired,
            revoked: b.revoked,
            ip: b.target,
            source: b.source,
            reason: b.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannedUserListDto {
    pub banned_users: Vec<BannedUserDto>,
}

#[derive(Debug, Serialize)]
pub struct BannedIpListDto {
    pub banned_ips: Vec<BannedIpDto>,
}

#[derive(Debug, Deserialize)]
pub struct BanUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<BanUserRequest> for BanRequest {
    fn from(r: BanUserRequest) -> Self {
        Self {
            target: r.username,
            expires: r.expires,
            permanent: r.permanent,
            source: r.source,
            reason: r.reason,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BanIpRequest {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<BanIpRequest> for BanRequest {
    fn from(r: BanIpRequest) -> Self {
        Self {
            target: r.ip,
            expires: r.expires,
            permanent: r.permanent,
            source: r.source,
            reason: r.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StorageHealthDto {
    pub status: &'static str,
    pub storage_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: &'static str,
}
