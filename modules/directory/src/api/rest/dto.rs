use serde::{Deserialize, Serialize};

use crate::domain::models::{DirectoryGroup, DirectoryUser, UserChanges};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub uid: String,
    pub display_name: String,
    pub mail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    pub entry_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<String>,
    pub member_of: Vec<String>,
}

impl From<DirectoryUser> for UserDto {
    fn from(u: DirectoryUser) -> Self {
        Self {
            uid: u.uid,
            display_name: u.display_name,
            mail: u.mail,
            given_name: u.given_name,
            sn: u.sn,
            entry_uuid: u.entry_uuid,
            create_timestamp: u.create_timestamp,
            member_of: u.member_of,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupDto {
    pub cn: String,
    pub member: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub entry_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<String>,
}

impl From<DirectoryGroup> for GroupDto {
    fn from(g: DirectoryGroup) -> Self {
        Self {
            cn: g.cn,
            member: g.member,
            description: g.description,
            entry_uuid: g.entry_uuid,
            create_timestamp: g.create_timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListDto {
    pub users: Vec<UserDto>,
    pub ldap_server: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupListDto {
    pub groups: Vec<GroupDto>,
    pub ldap_server: Option<String>,
}

/// Attribute edits; absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub given_name: Option<String>,
    pub sn: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            display_name: non_blank(req.display_name),
            mail: non_blank(req.mail),
            given_name: non_blank(req.given_name),
            sn: non_blank(req.sn),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub repeat_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: &'static str,
}
