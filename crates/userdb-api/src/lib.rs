//! Protocol types for the systemd userdb NameServiceSwitch socket
//!
//! This crate defines the messages exchanged with the identity service and
//! the identity shapes handed back to callers:
//! - Query requests and reply envelopes
//! - Group and user wire records
//! - Resolved identities (ids rendered as decimal strings)
//! - Record selectors (match by name or by id)

mod identity;
mod messages;
mod records;
mod selector;

pub use identity::*;
pub use messages::*;
pub use records::*;
pub use selector::*;

/// Name-service-switch backend every query is addressed to
pub const NSS_SERVICE: &str = "io.systemd.NameServiceSwitch";

/// Method retrieving group records
pub const GET_GROUP_RECORD: &str = "io.systemd.UserDatabase.GetGroupRecord";

/// Method retrieving user records
pub const GET_USER_RECORD: &str = "io.systemd.UserDatabase.GetUserRecord";

/// Varlink error sent when no record matches the query
pub const NO_RECORD_FOUND: &str = "io.systemd.UserDatabase.NoRecordFound";
