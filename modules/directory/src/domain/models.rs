/// A `person` entry of the users subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub uid: String,
    pub display_name: String,
    pub mail: String,
    pub given_name: Option<String>,
    pub sn: Option<String>,
    pub entry_uuid: String,
    pub create_timestamp: Option<String>,
    pub member_of: Vec<String>,
}

/// A `groupOfNames` entry of the groups subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    pub cn: String,
    pub member: Vec<String>,
    pub description: Option<String>,
    pub entry_uuid: String,
    pub create_timestamp: Option<String>,
}

/// Attribute replacements for one user; `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub given_name: Option<String>,
    pub sn: Option<String>,
}

impl UserChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.mail.is_none()
            && self.given_name.is_none()
            && self.sn.is_none()
    }
}
