//! `DirectoryClient` over LDAP using `ldap3`.
//!
//! Each operation opens a connection, binds as the configured service
//! account, runs and unbinds. Nothing is cached between operations.
//!
//! Searches use Authelia's own `users_filter`/`groups_filter` when set. Their
//! placeholders are expanded here; listings pass `*` as the input so the
//! filter turns into a presence match.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use authelia_config::{LdapAttributes, LdapSettings};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry, dn_escape, ldap_escape};
use secrecy::ExposeSecret;

use crate::domain::client::DirectoryClient;
use crate::domain::error::DirectoryError;
use crate::domain::models::{DirectoryGroup, DirectoryUser, UserChanges};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const PERSON_FILTER: &str = "(objectClass=person)";
const GROUP_FILTER: &str = "(objectClass=groupOfNames)";
const ANY_INPUT: &str = "*";

const ATTR_GIVEN_NAME: &str = "givenName";
const ATTR_SN: &str = "sn";
const ATTR_ENTRY_UUID: &str = "entryUUID";
const ATTR_CREATE_TIMESTAMP: &str = "createTimestamp";
const ATTR_MEMBER: &str = "member";
const ATTR_DESCRIPTION: &str = "description";
const ATTR_USER_PASSWORD: &str = "userPassword";

pub struct LdapDirectoryClient {
    settings: LdapSettings,
}

impl LdapDirectoryClient {
    #[must_use]
    pub fn new(settings: LdapSettings) -> Self {
        Self { settings }
    }

    async fn connect(&self) -> Result<Ldap, DirectoryError> {
        let conn_settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) = LdapConnAsync::with_settings(conn_settings, &self.settings.address)
            .await
            .map_err(|e| DirectoryError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection closed with error");
            }
        });

        ldap.simple_bind(
            &self.settings.bind_user,
            self.settings.bind_password.expose_secret(),
        )
        .await
        .and_then(ldap3::LdapResult::success)
        .map_err(|e| DirectoryError::Bind(e.to_string()))?;

        Ok(ldap)
    }

    async fn search(
        &self,
        base: &str,
        filter: &str,
        attrs: Vec<&str>,
    ) -> Result<Vec<SearchEntry>, DirectoryError> {
        let mut ldap = self.connect().await?;
        let result = ldap
            .search(base, Scope::Subtree, filter, attrs)
            .await
            .and_then(ldap3::SearchResult::success);
        unbind(&mut ldap).await;

        let (entries, _) = result?;
        Ok(entries.into_iter().map(SearchEntry::construct).collect())
    }

    async fn modify(&self, dn: &str, mods: Vec<Mod<String>>) -> Result<(), DirectoryError> {
        let mut ldap = self.connect().await?;
        let result = ldap
            .modify(dn, mods)
            .await
            .and_then(ldap3::LdapResult::success);
        unbind(&mut ldap).await;

        result?;
        Ok(())
    }

    fn user_attributes(&self) -> Vec<&str> {
        let attrs = &self.settings.attributes;
        vec![
            attrs.username.as_str(),
            attrs.display_name.as_str(),
            attrs.mail.as_str(),
            ATTR_GIVEN_NAME,
            ATTR_SN,
            ATTR_ENTRY_UUID,
            ATTR_CREATE_TIMESTAMP,
            attrs.member_of.as_str(),
        ]
    }

    /// User filter for `input`, which must already be escaped.
    fn users_filter(&self, input: &str) -> String {
        self.settings
            .users_filter
            .as_deref()
            .map_or_else(|| PERSON_FILTER.to_owned(), |t| expand_filter(t, &self.settings.attributes, input))
    }

    fn groups_filter(&self) -> String {
        self.settings
            .groups_filter
            .as_deref()
            .map_or_else(|| GROUP_FILTER.to_owned(), |t| expand_filter(t, &self.settings.attributes, ANY_INPUT))
    }

    /// A configured filter may also match on mail; the uid clause pins the entry.
    fn user_lookup_filter(&self, uid: &str) -> String {
        let escaped = ldap_escape(uid);
        format!(
            "(&{}({}={escaped}))",
            self.users_filter(&escaped),
            self.settings.attributes.username,
        )
    }

    fn user_dn(&self, uid: &str) -> String {
        format!(
            "{}={},{}",
            self.settings.attributes.username,
            dn_escape(uid),
            self.settings.users_base()
        )
    }

    fn to_user(&self, entry: &SearchEntry) -> DirectoryUser {
        let attrs = &self.settings.attributes;
        DirectoryUser {
            uid: first(&entry.attrs, &attrs.username).unwrap_or_default(),
            display_name: first(&entry.attrs, &attrs.display_name).unwrap_or_default(),
            mail: first(&entry.attrs, &attrs.mail).unwrap_or_default(),
            given_name: first(&entry.attrs, ATTR_GIVEN_NAME),
            sn: first(&entry.attrs, ATTR_SN),
            entry_uuid: first(&entry.attrs, ATTR_ENTRY_UUID).unwrap_or_default(),
            create_timestamp: first(&entry.attrs, ATTR_CREATE_TIMESTAMP),
            member_of: all(&entry.attrs, &attrs.member_of),
        }
    }

    fn to_group(&self, entry: &SearchEntry) -> DirectoryGroup {
        DirectoryGroup {
            cn: first(&entry.attrs, &self.settings.attributes.group_name).unwrap_or_default(),
            member: all(&entry.attrs, ATTR_MEMBER),
            description: first(&entry.attrs, ATTR_DESCRIPTION),
            entry_uuid: first(&entry.attrs, ATTR_ENTRY_UUID).unwrap_or_default(),
            create_timestamp: first(&entry.attrs, ATTR_CREATE_TIMESTAMP),
        }
    }
}

async fn unbind(ldap: &mut Ldap) {
    if let Err(e) = ldap.unbind().await {
        tracing::debug!(error = %e, "LDAP unbind failed");
    }
}

/// Attribute names are case-insensitive; servers may echo a different case.
fn values<'a>(attrs: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a Vec<String>> {
    attrs.get(name).or_else(|| {
        attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

/// Expand Authelia's `{...}` filter placeholders in a single pass, so text
/// taken from `input` is never expanded again. Unknown placeholders are kept.
fn expand_filter(template: &str, attrs: &LdapAttributes, input: &str) -> String {
    let mut out = String::with_capacity(template.len() + input.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        let Some(end) = tail.find('}') else {
            rest = tail;
            break;
        };
        let value = match &tail[1..end] {
            "username_attribute" => Some(attrs.username.as_str()),
            "mail_attribute" => Some(attrs.mail.as_str()),
            "display_name_attribute" => Some(attrs.display_name.as_str()),
            "member_of_attribute" => Some(attrs.member_of.as_str()),
            "group_name_attribute" => Some(attrs.group_name.as_str()),
            "input" | "username" | "dn" => Some(input),
            _ => None,
        };
        out.push_str(value.unwrap_or(&tail[..=end]));
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

fn first(attrs: &HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    values(attrs, name).and_then(|v| v.first().cloned())
}

fn all(attrs: &HashMap<String, Vec<String>>, name: &str) -> Vec<String> {
    values(attrs, name).cloned().unwrap_or_default()
}

fn replace(attr: &str, value: &str) -> Mod<String> {
    Mod::Replace(attr.to_owned(), HashSet::from([value.to_owned()]))
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let entries = self
            .search(&self.settings.users_base(), &self.users_filter(ANY_INPUT), self.user_attributes())
            .await?;
        Ok(entries.iter().map(|e| self.to_user(e)).collect())
    }

    async fn get_user(&self, uid: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
        let filter = self.user_lookup_filter(uid);
        let entries = self
            .search(&self.settings.users_base(), &filter, self.user_attributes())
            .await?;
        Ok(entries.first().map(|e| self.to_user(e)))
    }

    async fn update_user(&self, uid: &str, changes: &UserChanges) -> Result<(), DirectoryError> {
        let attrs = &self.settings.attributes;
        let mods: Vec<Mod<String>> = [
            (attrs.display_name.as_str(), changes.display_name.as_deref()),
            (attrs.mail.as_str(), changes.mail.as_deref()),
            (ATTR_GIVEN_NAME, changes.given_name.as_deref()),
            (ATTR_SN, changes.sn.as_deref()),
        ]
        .into_iter()
        .filter_map(|(attr, value)| value.map(|v| replace(attr, v)))
        .collect();

        if mods.is_empty() {
            return Ok(());
        }
        self.modify(&self.user_dn(uid), mods).await
    }

    async fn change_password(&self, uid: &str, new_password: &str) -> Result<(), DirectoryError> {
        self.modify(&self.user_dn(uid), vec![replace(ATTR_USER_PASSWORD, new_password)])
            .await
    }

    async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        let entries = self
            .search(
                &self.settings.groups_base(),
                &self.groups_filter(),
                vec![
                    self.settings.attributes.group_name.as_str(),
                    ATTR_MEMBER,
                    ATTR_DESCRIPTION,
                    ATTR_ENTRY_UUID,
                    ATTR_CREATE_TIMESTAMP,
                ],
            )
            .await?;
        Ok(entries.iter().map(|e| self.to_group(e)).collect())
    }

    fn server_address(&self) -> &str {
        &self.settings.address
    }
}
