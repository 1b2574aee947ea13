//! Resolved identities returned to callers

use serde::{Deserialize, Serialize};

use crate::{GroupRecord, UserRecord};

/// A resolved group. `gid` is the decimal rendering of the wire id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub gid: String,
}

/// A resolved user. `uid` and `gid` are decimal renderings of the wire ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub gid: String,
    pub username: String,
    /// Real or display name
    pub name: String,
    pub home_dir: String,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        Self {
            name: record.group_name,
            gid: record.gid.to_string(),
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            uid: record.uid.to_string(),
            gid: record.gid.to_string(),
            username: record.user_name,
            name: record.real_name,
            home_dir: record.home_directory,
        }
    }
}
