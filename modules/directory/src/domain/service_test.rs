//! Tests for the directory service against an in-memory directory.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::domain::client::DirectoryClient;
    use crate::domain::error::{DirectoryError, DomainError};
    use crate::domain::models::{DirectoryGroup, DirectoryUser, UserChanges};
    use crate::domain::service::DirectoryService;

    #[derive(Default)]
    struct InMemoryDirectory {
        users: Mutex<BTreeMap<String, DirectoryUser>>,
        passwords: Mutex<BTreeMap<String, String>>,
        groups: Vec<DirectoryGroup>,
        fail: bool,
    }

    fn user(uid: &str) -> DirectoryUser {
        DirectoryUser {
            uid: uid.to_owned(),
            display_name: uid.to_uppercase(),
            mail: format!("{uid}@example.com"),
            given_name: None,
            sn: Some(uid.to_owned()),
            entry_uuid: format!("uuid-{uid}"),
            create_timestamp: None,
            member_of: vec![],
        }
    }

    fn group(cn: &str) -> DirectoryGroup {
        DirectoryGroup {
            cn: cn.to_owned(),
            member: vec![],
            description: None,
            entry_uuid: format!("uuid-{cn}"),
            create_timestamp: None,
        }
    }

    impl InMemoryDirectory {
        fn with_users(uids: &[&str]) -> Self {
            let users = uids.iter().map(|u| ((*u).to_owned(), user(u))).collect();
            Self {
                users: Mutex::new(users),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), DirectoryError> {
            if self.fail {
                Err(DirectoryError::Connection("connection refused".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DirectoryClient for InMemoryDirectory {
        async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
            self.check()?;
            // Reverse order so sorting is observable
            Ok(self.users.lock().unwrap().values().rev().cloned().collect())
        }

        async fn get_user(&self, uid: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
            self.check()?;
            Ok(self.users.lock().unwrap().get(uid).cloned())
        }

        async fn update_user(&self, uid: &str, changes: &UserChanges) -> Result<(), DirectoryError> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            let entry = users
                .get_mut(uid)
                .ok_or_else(|| DirectoryError::Operation("no such object".to_owned()))?;
            if let Some(v) = &changes.display_name {
                entry.display_name.clone_from(v);
            }
            if let Some(v) = &changes.mail {
                entry.mail.clone_from(v);
            }
            if let Some(v) = &changes.given_name {
                entry.given_name = Some(v.clone());
            }
            if let Some(v) = &changes.sn {
                entry.sn = Some(v.clone());
            }
            Ok(())
        }

        async fn change_password(&self, uid: &str, new_password: &str) -> Result<(), DirectoryError> {
            self.check()?;
            self.passwords
                .lock()
                .unwrap()
                .insert(uid.to_owned(), new_password.to_owned());
            Ok(())
        }

        async fn list_groups(&self) -> Result<Vec<DirectoryGroup>, DirectoryError> {
            self.check()?;
            Ok(self.groups.clone())
        }

        fn server_address(&self) -> &str {
            "ldap://openldap:389"
        }
    }

    fn service(directory: InMemoryDirectory) -> (DirectoryService, Arc<InMemoryDirectory>) {
        let directory = Arc::new(directory);
        let client: Arc<dyn DirectoryClient> = directory.clone();
        (DirectoryService::new(Some(client)), directory)
    }

    #[tokio::test]
    async fn users_are_sorted_by_uid() {
        let (svc, _) = service(InMemoryDirectory::with_users(&["carol", "alice", "bob"]));

        let users = svc.list_users().await.unwrap();

        let uids: Vec<_> = users.iter().map(|u| u.uid.as_str()).collect();
        assert_eq!(uids, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn groups_are_sorted_by_cn() {
        let (svc, _) = service(InMemoryDirectory {
            groups: vec![group("ops"), group("admins"), group("dev")],
            ..InMemoryDirectory::default()
        });

        let groups = svc.list_groups().await.unwrap();

        let names: Vec<_> = groups.iter().map(|g| g.cn.as_str()).collect();
        assert_eq!(names, vec!["admins", "dev", "ops"]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (svc, _) = service(InMemoryDirectory::with_users(&["alice"]));

        let err = svc.get_user("mallory").await.unwrap_err();

        assert!(matches!(err, DomainError::UserNotFound(ref uid) if uid == "mallory"));
        assert_eq!(err.to_string(), "User \"mallory\" not found");
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() {
        let (svc, _) = service(InMemoryDirectory::with_users(&["alice"]));

        let updated = svc
            .update_user(
                "alice",
                UserChanges {
                    display_name: Some("Alice Liddell".to_owned()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Alice Liddell");
        assert_eq!(updated.mail, "alice@example.com");
    }

    #[tokio::test]
    async fn update_rejects_invalid_mail_before_touching_directory() {
        let (svc, dir) = service(InMemoryDirectory::with_users(&["alice"]));

        let err = svc
            .update_user(
                "alice",
                UserChanges {
                    mail: Some("not-an-address".to_owned()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            dir.users.lock().unwrap()["alice"].mail,
            "alice@example.com"
        );
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let (svc, _) = service(InMemoryDirectory::with_users(&[]));

        let err = svc
            .update_user("ghost", UserChanges::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn password_change_is_validated_and_applied() {
        let (svc, dir) = service(InMemoryDirectory::with_users(&["alice"]));

        let err = svc
            .change_password("alice", "short", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(dir.passwords.lock().unwrap().is_empty());

        svc.change_password("alice", "s3cure-enough", "s3cure-enough")
            .await
            .unwrap();
        assert_eq!(dir.passwords.lock().unwrap()["alice"], "s3cure-enough");
    }

    #[tokio::test]
    async fn missing_configuration_is_reported() {
        let svc = DirectoryService::new(None);

        assert!(matches!(
            svc.list_users().await.unwrap_err(),
            DomainError::NotConfigured
        ));
        assert!(svc.server_address().is_none());
    }

    #[tokio::test]
    async fn directory_failures_propagate() {
        let (svc, _) = service(InMemoryDirectory {
            fail: true,
            ..InMemoryDirectory::default()
        });

        assert!(matches!(
            svc.list_groups().await.unwrap_err(),
            DomainError::Directory(_)
        ));
        assert_eq!(svc.server_address().as_deref(), Some("ldap://openldap:389"));
    }
}
