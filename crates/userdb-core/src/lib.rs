//! User and group resolution via systemd-userdbd
//!
//! This crate is the lookup surface used when the C library's name service
//! switch is not available. It offers four operations, each returning a
//! resolved identity, `None` when no such user or group exists, or an error:
//! - Group by name / by gid
//! - User by name / by uid
//!
//! [`Resolver`] is async; [`BlockingResolver`] wraps it for synchronous callers.

mod blocking;
mod resolver;

pub use blocking::*;
pub use resolver::*;

pub use userdb_api::{Group, Selector, User};
pub use userdb_config::ResolverConfig;
pub use userdb_ipc::{ProtocolError, QueryError, QueryResult, TransportError};
