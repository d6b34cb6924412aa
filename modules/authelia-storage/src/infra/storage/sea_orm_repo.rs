use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryOrder,
    QuerySelect,
};
use tokio::sync::OnceCell;

use crate::domain::error::StorageError;
use crate::domain::models::{Ban, BanTarget, NewBan, TotpConfiguration, TotpHistoryEntry};
use crate::domain::repo::StorageRepository;

use super::entity::{banned_ip, banned_user, totp_configuration, totp_history};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 4;

/// Format Authelia uses for timestamps written by the console.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// `SQLite` repository over the database file Authelia writes.
///
/// The file is opened read-write and never created. The connection is
/// established on first use and kept; a failed attempt is retried by the next
/// call. sqlx gives every `SQLite` connection a 5 s busy timeout, which lets
/// writes wait for Authelia's own transactions.
pub struct SeaOrmStorageRepository {
    path: PathBuf,
    conn: OnceCell<DatabaseConnection>,
}

impl SeaOrmStorageRepository {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            conn: OnceCell::new(),
        }
    }

    fn url(&self) -> String {
        format!("sqlite://{}?mode=rw", self.path.display())
    }

    async fn conn(&self) -> Result<&DatabaseConnection, StorageError> {
        self.conn
            .get_or_try_init(|| async {
                let mut opts = ConnectOptions::new(self.url());
                opts.max_connections(MAX_CONNECTIONS)
                    .connect_timeout(CONNECT_TIMEOUT)
                    .sqlx_logging(false);
                let conn = Database::connect(opts).await.map_err(|e| {
                    tracing::error!(path = %self.path.display(), error = %e, "Failed to open storage database");
                    StorageError::Connection(e.to_string())
                })?;
                tracing::info!(path = %self.path.display(), "Opened storage database");
                Ok::<_, StorageError>(conn)
            })
            .await
    }
}

fn format_timestamp(value: Option<chrono::NaiveDateTime>) -> Option<String> {
    value.map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

impl From<totp_configuration::Model> for TotpConfiguration {
    fn from(m: totp_configuration::Model) -> Self {
        Self {
            id: m.id,
            created_at: m.created_at,
            last_used_at: m.last_used_at,
            username: m.username,
            issuer: m.issuer,
            algorithm: m.algorithm,
            digits: m.digits,
            period: m.period,
        }
    }
}

impl From<totp_history::Model> for TotpHistoryEntry {
    fn from(m: totp_history::Model) -> Self {
        Self {
            id: m.id,
            created_at: m.created_at,
            username: m.username,
            step: m.step,
        }
    }
}

impl From<banned_user::Model> for Ban {
    fn from(m: banned_user::Model) -> Self {
        Self {
            id: m.id,
            time: m.time,
            expires: m.expires,
            expired: m.expired,
            revoked: m.revoked,
            target: m.username,
            source: m.source,
            reason: m.reason,
        }
    }
}

impl From<banned_ip::Model> for Ban {
    fn from(m: banned_ip::Model) -> Self {
        Self {
            id: m.id,
            time: m.time,
            expires: m.expires,
            expired: m.expired,
            revoked: m.revoked,
            target: m.ip,
            source: m.source,
            reason: m.reason,
        }
    }
}

fn inserted_row_missing(id: i64) -> StorageError {
    StorageError::Query(format!("inserted ban {id} could not be read back"))
}

#[async_trait]
impl StorageRepository for SeaOrmStorageRepository {
    async fn list_totp_configurations(&self) -> Result<Vec<TotpConfiguration>, StorageError> {
        let rows = totp_configuration::Entity::find()
            .order_by_asc(totp_configuration::Column::Username)
            .all(self.conn().await?)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_totp_configuration(&self, id: i64) -> Result<bool, StorageError> {
        let res = totp_configuration::Entity::delete_by_id(id)
            .exec(self.conn().await?)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn totp_history(&self, limit: u64) -> Result<Vec<TotpHistoryEntry>, StorageError> {
        let rows = totp_history::Entity::find()
            .order_by_desc(totp_history::Column::CreatedAt)
            .order_by_desc(totp_history::Column::Id)
            .limit(limit)
            .all(self.conn().await?)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_bans(&self, target: BanTarget) -> Result<Vec<Ban>, StorageError> {
        let conn = self.conn().await?;
        let bans = match target {
            BanTarget::User => banned_user::Entity::find()
                .order_by_desc(banned_user::Column::Time)
                .order_by_desc(banned_user::Column::Id)
                .all(conn)
                .await?
                .into_iter()
                .map(Ban::from)
                .collect(),
            BanTarget::Ip => banned_ip::Entity::find()
                .order_by_desc(banned_ip::Column::Time)
                .order_by_desc(banned_ip::Column::Id)
                .all(conn)
                .await?
                .into_iter()
                .map(Ban::from)
                .collect(),
        };
        Ok(bans)
    }

    async fn insert_ban(&self, target: BanTarget, ban: NewBan) -> Result<Ban, StorageError> {
        let conn = self.conn().await?;
        let expires = format_timestamp(ban.expires);
        match target {
            BanTarget::User => {
                let row = banned_user::ActiveModel {
                    id: ActiveValue::NotSet,
                    time: ActiveValue::NotSet,
                    expires: ActiveValue::Set(expires),
                    expired: ActiveValue::NotSet,
                    revoked: ActiveValue::NotSet,
                    username: ActiveValue::Set(ban.target),
                    source: ActiveValue::Set(ban.source),
                    reason: ActiveValue::Set(ban.reason),
                };
                let id = banned_user::Entity::insert(row).exec(conn).await?.last_insert_id;
                banned_user::Entity::find_by_id(id)
                    .one(conn)
                    .await?
                    .map(Ban::from)
                    .ok_or_else(|| inserted_row_missing(id))
            }
            BanTarget::Ip => {
                let row = banned_ip::ActiveModel {
                    id: ActiveValue::NotSet,
                    time: ActiveValue::NotSet,
                    expires: ActiveValue::Set(expires),
                    expired: ActiveValue::NotSet,
                    revoked: ActiveValue::NotSet,
                    ip: ActiveValue::Set(ban.target),
                    source: ActiveValue::Set(ban.source),
                    reason: ActiveValue::Set(ban.reason),
                };
                let id = banned_ip::Entity::insert(row).exec(conn).await?.last_insert_id;
                banned_ip::Entity::find_by_id(id)
                    .one(conn)
                    .await?
                    .map(Ban::from)
                    .ok_or_else(|| inserted_row_missing(id))
            }
        }
    }

    async fn delete_ban(&self, target: BanTarget, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn().await?;
        let res = match target {
            BanTarget::User => banned_user::Entity::delete_by_id(id).exec(conn).await?,
            BanTarget::Ip => banned_ip::Entity::delete_by_id(id).exec(conn).await?,
        };
        Ok(res.rows_affected > 0)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.conn().await?.ping().await?;
        Ok(())
    }
}
