//! Authelia storage module: TOTP registrations, TOTP history and ban lists.
//!
//! Authelia owns the schema; this crate only reads and edits rows in the
//! tables it already created. Only the `SQLite` backend is implemented.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::repo::StorageRepository;
pub use domain::service::StorageService;
pub use infra::storage::sea_orm_repo::SeaOrmStorageRepository;
