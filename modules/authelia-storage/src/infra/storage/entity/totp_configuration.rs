use sea_orm::entity::prelude::*;

/// `totp_configurations` without its `secret` column, which is never selected.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "totp_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_at: String,
    pub last_used_at: Option<String>,
    pub username: String,
    pub issuer: Option<String>,
    pub algorithm: String,
    pub digits: i64,
    pub period: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
