use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "banned_ip")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub time: String,
    pub expires: Option<String>,
    pub expired: Option<String>,
    pub revoked: bool,
    pub ip: String,
    pub source: String,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
