//! Explicit wiring of the console: verifier, policy, module services and the
//! gateway that hosts them.

use std::sync::Arc;

use access_policy::AccessPolicy;
use anyhow::Context;
use api_gateway::ApiGateway;
use authelia_config::AutheliaSettings;
use authelia_storage::StorageService;
use authelia_verifier::AutheliaVerifier;
use axum::Router;
use directory::{DirectoryClient, DirectoryService, LdapDirectoryClient};
use notifications::NotificationLog;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Assembled application, ready to serve.
pub struct Console {
    gateway: ApiGateway,
    router: Router,
}

impl Console {
    /// Build every component from `config` and Authelia's `settings`.
    ///
    /// # Errors
    /// Fails when the session verifier's HTTP client cannot be constructed.
    pub fn build(config: &AppConfig, settings: AutheliaSettings) -> anyhow::Result<Self> {
        let verifier = AutheliaVerifier::new(&config.verifier)
            .context("failed to build the Authelia session verifier")?;
        tracing::info!(state_url = %verifier.state_url(), "Session verifier ready");

        let policy = AccessPolicy::from_config(&config.access);
        tracing::info!(allowed_users = ?policy.allowed_users(), "Access policy loaded");

        let directory_client = settings
            .ldap
            .map(|ldap| Arc::new(LdapDirectoryClient::new(ldap)) as Arc<dyn DirectoryClient>);
        let directory = Arc::new(DirectoryService::new(directory_client));
        let storage = Arc::new(StorageService::from_backend(settings.storage.as_ref()));
        let notifications = Arc::new(NotificationLog::new(settings.filesystem_notifier));

        let mut api = Router::new();
        api = directory::api::rest::routes::register_routes(api, directory);
        api = authelia_storage::api::rest::routes::register_routes(api, storage);
        api = notifications::api::rest::routes::register_routes(api, notifications);

        let gateway = ApiGateway::new(config.server.clone(), Arc::new(verifier), Arc::new(policy));
        let router = gateway.build_router(api);
        Ok(Self { gateway, router })
    }

    #[cfg(test)]
    fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `cancel` fires.
    ///
    /// # Errors
    /// Propagates bind and server failures.
    pub async fn serve(self, cancel: CancellationToken) -> anyhow::Result<()> {
        self.gateway.serve(self.router, cancel).await
    }
}
