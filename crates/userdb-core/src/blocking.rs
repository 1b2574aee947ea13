//! Synchronous facade over [`Resolver`]

use tokio::runtime::{Builder, Runtime};
use userdb_api::{Group, User};
use userdb_config::ResolverConfig;
use userdb_ipc::QueryResult;

use crate::Resolver;

/// Blocking resolver for callers outside an async runtime
///
/// Each lookup blocks the calling thread on a private current-thread
/// runtime. Must not be used from within an async context.
pub struct BlockingResolver {
    inner: Resolver,
    runtime: Runtime,
}

impl BlockingResolver {
    pub fn new(config: ResolverConfig) -> std::io::Result<Self> {
        Self::from_resolver(Resolver::new(config))
    }

    pub fn from_resolver(inner: Resolver) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    pub fn lookup_group(&self, name: &str) -> QueryResult<Option<Group>> {
        self.runtime.block_on(self.inner.lookup_group(name))
    }

    pub fn lookup_group_id(&self, gid: &str) -> QueryResult<Option<Group>> {
        self.runtime.block_on(self.inner.lookup_group_id(gid))
    }

    pub fn lookup_user(&self, username: &str) -> QueryResult<Option<User>> {
        self.runtime.block_on(self.inner.lookup_user(username))
    }

    pub fn lookup_user_id(&self, uid: &str) -> QueryResult<Option<User>> {
        self.runtime.block_on(self.inner.lookup_user_id(uid))
    }
}
