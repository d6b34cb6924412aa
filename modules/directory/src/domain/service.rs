use std::sync::Arc;

use super::client::DirectoryClient;
use super::error::DomainError;
use super::models::{DirectoryGroup, DirectoryUser, UserChanges};
use super::validation;

/// Directory operations exposed to the REST layer.
///
/// `client` is `None` when Authelia's configuration has no LDAP backend; every
/// operation then fails with [`DomainError::NotConfigured`].
pub struct DirectoryService {
    client: Option<Arc<dyn DirectoryClient>>,
}

impl DirectoryService {
    #[must_use]
    pub fn new(client: Option<Arc<dyn DirectoryClient>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&dyn DirectoryClient, DomainError> {
        self.client.as_deref().ok_or(DomainError::NotConfigured)
    }

    /// Configured directory address, if any.
    #[must_use]
    pub fn server_address(&self) -> Option<String> {
        self.client.as_ref().map(|c| c.server_address().to_owned())
    }

    /// Users sorted by uid.
    ///
    /// # Errors
    /// Returns [`DomainError::NotConfigured`] without LDAP configuration and
    /// [`DomainError::Directory`] when the directory fails.
    pub async fn list_users(&self) -> Result<Vec<DirectoryUser>, DomainError> {
        let mut users = self.client()?.list_users().await?;
        users.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(users)
    }

    /// # Errors
    /// Returns [`DomainError::UserNotFound`] when no entry matches `uid`.
    pub async fn get_user(&self, uid: &str) -> Result<DirectoryUser, DomainError> {
        self.client()?
            .get_user(uid)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(uid.to_owned()))
    }

    /// Apply attribute changes after validating them.
    ///
    /// # Errors
    /// Returns [`DomainError::Validation`] for a malformed mail address and
    /// [`DomainError::UserNotFound`] when the user does not exist.
    pub async fn update_user(&self, uid: &str, changes: UserChanges) -> Result<DirectoryUser, DomainError> {
        if let Some(mail) = &changes.mail {
            validation::validate_mail(mail)?;
        }
        let client = self.client()?;
        if client.get_user(uid).await?.is_none() {
            return Err(DomainError::UserNotFound(uid.to_owned()));
        }

        if !changes.is_empty() {
            client.update_user(uid, &changes).await?;
            tracing::info!(%uid, "Directory user updated");
        }

        client
            .get_user(uid)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(uid.to_owned()))
    }

    /// # Errors
    /// Returns [`DomainError::Validation`] when the password rules are not met
    /// and [`DomainError::UserNotFound`] when the user does not exist.
    pub async fn change_password(
        &self,
        uid: &str,
        new_password: &str,
        repeat_password: &str,
    ) -> Result<(), DomainError> {
        validation::validate_new_password(new_password, repeat_password)?;
        let client = self.client()?;
        if client.get_user(uid).await?.is_none() {
            return Err(DomainError::UserNotFound(uid.to_owned()));
        }

        client.change_password(uid, new_password).await?;
        tracing::info!(%uid, "Directory user password changed");
        Ok(())
    }

    /// Groups sorted by cn.
    ///
    /// # Errors
    /// Returns [`DomainError::NotConfigured`] without LDAP configuration and
    /// [`DomainError::Directory`] when the directory fails.
    pub async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, DomainError> {
        let mut groups = self.client()?.list_groups().await?;
        groups.sort_by(|a, b| a.cn.cmp(&b.cn));
        Ok(groups)
    }
}
