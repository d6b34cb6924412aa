#![allow(clippy::unwrap_used, clippy::expect_used)]

//! REST tests over a real `SQLite` file laid out like Authelia's storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use authelia_config::StorageBackend;
use authelia_storage::StorageService;
use authelia_storage::api::rest::routes::register_routes;
use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode},
};
use console_security::Identity;
use sea_orm::{ConnectionTrait, Database};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const SCHEMA: &[&str] = &[
    "CREATE TABLE totp_configurations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_used_at DATETIME NULL DEFAULT NULL,
        username VARCHAR(100) NOT NULL,
        issuer VARCHAR(100),
        algorithm VARCHAR(6) NOT NULL DEFAULT 'SHA1',
        digits INTEGER NOT NULL DEFAULT 6,
        period INTEGER NOT NULL DEFAULT 30,
        secret BLOB NOT NULL
    )",
    "CREATE TABLE totp_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        username VARCHAR(100) NOT NULL,
        step CHAR(64) NOT NULL
    )",
    "CREATE TABLE banned_user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        time DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        expires DATETIME NULL DEFAULT NULL,
        expired DATETIME NULL DEFAULT NULL,
        revoked BOOLEAN NOT NULL DEFAULT FALSE,
        username VARCHAR(100) NOT NULL,
        source VARCHAR(10) NOT NULL,
        reason VARCHAR(100) NULL DEFAULT NULL
    )",
    "CREATE TABLE banned_ip (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        time DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        expires DATETIME NULL DEFAULT NULL,
        expired DATETIME NULL DEFAULT NULL,
        revoked BOOLEAN NOT NULL DEFAULT FALSE,
        ip VARCHAR(39) NOT NULL,
        source VARCHAR(10) NOT NULL,
        reason VARCHAR(100) NULL DEFAULT NULL
    )",
    "INSERT INTO totp_configurations (created_at, username, issuer, secret)
        VALUES ('2030-01-02 10:00:00', 'zoe', 'Authelia', X'DEADBEEF')",
    "INSERT INTO totp_configurations (created_at, last_used_at, username, issuer, secret)
        VALUES ('2030-01-01 10:00:00', '2030-01-05 08:00:00', 'admin', 'Authelia', X'CAFEBABE')",
    "INSERT INTO totp_history (created_at, username, step) VALUES ('2030-01-01 10:00:00', 'admin', '100')",
    "INSERT INTO totp_history (created_at, username, step) VALUES ('2030-01-03 10:00:00', 'zoe', '101')",
    "INSERT INTO totp_history (created_at, username, step) VALUES ('2030-01-02 10:00:00', 'admin', '102')",
    "INSERT INTO banned_user (time, username, source, reason)
        VALUES ('2030-01-01 00:00:00', 'old', 'regulation', NULL)",
    "INSERT INTO banned_user (time, expires, username, source, reason)
        VALUES ('2030-02-01 00:00:00', '2030-03-01 00:00:00', 'recent', 'admin', 'abuse')",
];

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

async fn seeded_database() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.sqlite3");
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    for statement in SCHEMA {
        db.execute_unprepared(statement).await.unwrap();
    }
    db.close().await.unwrap();
    Fixture { _dir: dir, path }
}

fn app_for(path: &Path) -> Router {
    let backend = StorageBackend::Sqlite {
        path: path.to_path_buf(),
    };
    let service = Arc::new(StorageService::from_backend(Some(&backend)));
    register_routes(Router::new(), service).layer(Extension(Identity::new("admin", 2)))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn totp_configurations_are_sorted_and_secrets_redacted() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(&app, "GET", "/totp/configurations", None).await;
    assert_eq!(status, StatusCode::OK);
    let configs = json["configurations"].as_array().unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0]["username"], "admin");
    assert_eq!(configs[0]["last_used_at"], "2030-01-05 08:00:00");
    assert_eq!(configs[1]["username"], "zoe");
    assert_eq!(configs[1]["algorithm"], "SHA1");
    assert_eq!(configs[1]["digits"], 6);
    assert_eq!(configs[1]["period"], 30);
    for config in configs {
        assert_eq!(config["secret"], "[ENCRYPTED]");
    }
}

#[tokio::test]
async fn deleting_totp_configuration() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, _) = call(&app, "DELETE", "/totp/configurations/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = call(&app, "DELETE", "/totp/configurations/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "TOTP configuration not found");

    let (_, json) = call(&app, "GET", "/totp/configurations", None).await;
    assert_eq!(json["configurations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn totp_history_newest_first_with_stats() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(&app, "GET", "/totp/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let steps: Vec<&str> = json["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["step"].as_str().unwrap())
        .collect();
    assert_eq!(steps, vec!["101", "102", "100"]);
    assert_eq!(json["stats"]["total_entries"], 3);
    assert_eq!(json["stats"]["unique_users"], 2);
    assert_eq!(json["stats"]["most_recent_use"], "2030-01-03 10:00:00");
    assert_eq!(json["stats"]["oldest_entry"], "2030-01-01 10:00:00");
    assert_eq!(json["grouped_by_user"]["admin"].as_array().unwrap().len(), 2);

    let (_, json) = call(&app, "GET", "/totp/history?limit=1", None).await;
    assert_eq!(json["history"].as_array().unwrap().len(), 1);
    assert_eq!(json["history"][0]["username"], "zoe");
}

#[tokio::test]
async fn banned_users_newest_first() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(&app, "GET", "/banned/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let bans = json["banned_users"].as_array().unwrap();
    assert_eq!(bans[0]["username"], "recent");
    assert_eq!(bans[0]["expires"], "2030-03-01 00:00:00");
    assert_eq!(bans[0]["reason"], "abuse");
    assert_eq!(bans[0]["revoked"], false);
    assert_eq!(bans[1]["username"], "old");
    assert_eq!(bans[1]["expires"], Value::Null);
}

#[tokio::test]
async fn ip_ban_lifecycle() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(
        &app,
        "POST",
        "/banned/ips",
        Some(json!({ "ip": "192.0.2.7", "expires": "2031-05-06T07:08", "reason": "scanner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["ip"], "192.0.2.7");
    assert_eq!(json["source"], "admin");
    assert_eq!(json["reason"], "scanner");
    assert_eq!(json["expires"], "2031-05-06 07:08:00.000");
    let id = json["id"].as_i64().unwrap();

    let (_, json) = call(&app, "GET", "/banned/ips", None).await;
    assert_eq!(json["banned_ips"].as_array().unwrap().len(), 1);

    let (status, _) = call(&app, "DELETE", &format!("/banned/ips/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = call(&app, "DELETE", &format!("/banned/ips/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Banned IP record not found");
}

#[tokio::test]
async fn permanent_user_ban_has_no_expiry() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(
        &app,
        "POST",
        "/banned/users",
        Some(json!({ "username": "mallory", "permanent": true, "expires": "2031-01-01T00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["username"], "mallory");
    assert_eq!(json["expires"], Value::Null);
}

#[tokio::test]
async fn ban_validation_errors_are_400() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(&app, "POST", "/banned/ips", Some(json!({ "ip": "999.1.1.1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Invalid IP address format");

    let (status, json) = call(&app, "POST", "/banned/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Username is required");

    let (status, json) = call(
        &app,
        "POST",
        "/banned/users",
        Some(json!({ "username": "x", "expires": "soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Invalid expiration date");
}

#[tokio::test]
async fn unparsable_requests_are_problem_documents() {
    let fx = seeded_database().await;
    let app = app_for(&fx.path);

    let (status, json) = call(&app, "DELETE", "/banned/ips/latest", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["title"], "Bad Request");

    let (status, json) = call(&app, "GET", "/totp/history?limit=-5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, json) = call(&app, "POST", "/banned/ips", Some(json!(["192.0.2.7"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (_, json) = call(&app, "GET", "/banned/ips", None).await;
    assert!(json["banned_ips"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn storage_health_reports_backend() {
    let fx = seeded_database().await;
    let (status, json) = call(&app_for(&fx.path), "GET", "/storage/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage_type"], "sqlite");
}

#[tokio::test]
async fn missing_database_file_is_502_and_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite3");
    let app = app_for(&path);

    let (status, json) = call(&app, "GET", "/banned/users", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["detail"], "Storage request failed");
    assert!(!path.exists());
}

#[tokio::test]
async fn unconfigured_and_unsupported_backends() {
    let app = register_routes(Router::new(), Arc::new(StorageService::from_backend(None)))
        .layer(Extension(Identity::new("admin", 2)));
    let (status, json) = call(&app, "GET", "/totp/configurations", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Database configuration not found in Authelia config");

    let backend = StorageBackend::Postgres {
        address: "tcp://postgres:5432".to_owned(),
    };
    let app = register_routes(
        Router::new(),
        Arc::new(StorageService::from_backend(Some(&backend))),
    )
    .layer(Extension(Identity::new("admin", 2)));
    let (status, json) = call(&app, "GET", "/banned/ips", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json["detail"], "Database type \"postgres\" is not yet supported");
}
