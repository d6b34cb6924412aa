use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// A TOTP registration. The shared secret is never loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpConfiguration {
    pub id: i64,
    pub created_at: String,
    pub last_used_at: Option<String>,
    pub username: String,
    pub issuer: Option<String>,
    pub algorithm: String,
    pub digits: i64,
    pub period: i64,
}

/// One accepted TOTP code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpHistoryEntry {
    pub id: i64,
    pub created_at: String,
    pub username: String,
    pub step: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpHistoryStats {
    pub total_entries: usize,
    pub unique_users: usize,
    pub most_recent_use: Option<String>,
    pub oldest_entry: Option<String>,
}

/// Recent TOTP history, newest first, with a per-user breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpHistoryReport {
    pub entries: Vec<TotpHistoryEntry>,
    pub grouped_by_user: BTreeMap<String, Vec<TotpHistoryEntry>>,
    pub stats: TotpHistoryStats,
}

impl TotpHistoryReport {
    /// Build the report from entries already ordered newest first.
    #[must_use]
    pub fn from_entries(entries: Vec<TotpHistoryEntry>) -> Self {
        let mut grouped_by_user: BTreeMap<String, Vec<TotpHistoryEntry>> = BTreeMap::new();
        for entry in &entries {
            grouped_by_user
                .entry(entry.username.clone())
                .or_default()
                .push(entry.clone());
        }
        let stats = TotpHistoryStats {
            total_entries: entries.len(),
            unique_users: grouped_by_user.len(),
            most_recent_use: entries.first().map(|e| e.created_at.clone()),
            oldest_entry: entries.last().map(|e| e.created_at.clone()),
        };
        Self {
            entries,
            grouped_by_user,
            stats,
        }
    }
}

/// A row of `banned_user` or `banned_ip`; `target` is the username or the IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub id: i64,
    pub time: String,
    pub expires: Option<String>,
    pub expired: Option<String>,
    pub revoked: bool,
    pub target: String,
    pub source: String,
    pub reason: Option<String>,
}

/// What a ban targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanTarget {
    User,
    Ip,
}

impl BanTarget {
    pub(crate) fn not_found_message(self) -> &'static str {
        match self {
            Self::User => "Banned user record not found",
            Self::Ip => "Banned IP record not found",
        }
    }
}

/// Ban request as submitted by an operator, before validation.
#[derive(Debug, Clone, Default)]
pub struct BanRequest {
    pub target: String,
    pub expires: Option<String>,
    pub permanent: bool,
    pub source: Option<String>,
    pub reason: Option<String>,
}

/// Validated ban ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBan {
    pub target: String,
    pub expires: Option<NaiveDateTime>,
    pub source: String,
    pub reason: Option<String>,
}
