pub mod entity;
pub mod sea_orm_repo;
