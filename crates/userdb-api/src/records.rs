//! Group and user records as sent by the identity service

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{GET_GROUP_RECORD, GET_USER_RECORD};

/// A record type that can be queried from the identity service
pub trait WireRecord: DeserializeOwned + Send {
    /// Backend method returning records of this type
    const METHOD: &'static str;

    /// Group or user name
    fn name(&self) -> &str;

    /// Numeric gid or uid
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub group_name: String,
    pub gid: i64,
}

impl WireRecord for GroupRecord {
    const METHOD: &'static str = GET_GROUP_RECORD;

    fn name(&self) -> &str {
        &self.group_name
    }

    fn id(&self) -> i64 {
        self.gid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_name: String,
    /// Often absent for system users
    #[serde(default)]
    pub real_name: String,
    pub uid: i64,
    pub gid: i64,
    #[serde(default)]
    pub home_directory: String,
}

impl WireRecord for UserRecord {
    const METHOD: &'static str = GET_USER_RECORD;

    fn name(&self) -> &str {
        &self.user_name
    }

    fn id(&self) -> i64 {
        self.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_field_names() {
        let json = r#"{"userName":"alice","realName":"Alice Liddell","uid":1000,"gid":100,"homeDirectory":"/home/alice","disposition":"regular"}"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.user_name, "alice");
        assert_eq!(record.real_name, "Alice Liddell");
        assert_eq!(record.uid, 1000);
        assert_eq!(record.gid, 100);
        assert_eq!(record.home_directory, "/home/alice");
    }

    #[test]
    fn user_record_optional_fields() {
        let json = r#"{"userName":"nobody","uid":65534,"gid":65534}"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.real_name, "");
        assert_eq!(record.home_directory, "");
    }

    #[test]
    fn methods_per_record_type() {
        assert_eq!(GroupRecord::METHOD, "io.systemd.UserDatabase.GetGroupRecord");
        assert_eq!(UserRecord::METHOD, "io.systemd.UserDatabase.GetUserRecord");
    }
}
