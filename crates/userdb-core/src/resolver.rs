//! Group and user resolvers

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use userdb_api::{Group, GroupRecord, Selector, User, UserRecord, WireRecord};
use userdb_config::ResolverConfig;
use userdb_ipc::{FramedTransport, QueryResult, query_record};

/// Resolves users and groups against the identity service
///
/// Every lookup opens its own connection, so a resolver can be shared
/// between tasks freely.
#[derive(Debug, Clone)]
pub struct Resolver {
    transport: FramedTransport,
    cancel: CancellationToken,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            transport: FramedTransport::new(&config.socket_path),
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight and future lookups when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn transport(&self) -> &FramedTransport {
        &self.transport
    }

    /// Look up a group by exact name
    pub async fn lookup_group(&self, name: &str) -> QueryResult<Option<Group>> {
        self.group(&Selector::name(name)).await
    }

    /// Look up a group by decimal gid (compared as a string)
    pub async fn lookup_group_id(&self, gid: &str) -> QueryResult<Option<Group>> {
        self.group(&Selector::id(gid)).await
    }

    /// Look up a user by exact username
    pub async fn lookup_user(&self, username: &str) -> QueryResult<Option<User>> {
        self.user(&Selector::name(username)).await
    }

    /// Look up a user by decimal uid (compared as a string)
    pub async fn lookup_user_id(&self, uid: &str) -> QueryResult<Option<User>> {
        self.user(&Selector::id(uid)).await
    }

    #[instrument(skip_all, fields(selector = %selector))]
    pub async fn group(&self, selector: &Selector) -> QueryResult<Option<Group>> {
        let record: Option<GroupRecord> = self.query(selector).await?;
        let group = record.map(Group::from);
        debug!(found = group.is_some(), "Group lookup finished");
        Ok(group)
    }

    #[instrument(skip_all, fields(selector = %selector))]
    pub async fn user(&self, selector: &Selector) -> QueryResult<Option<User>> {
        let record: Option<UserRecord> = self.query(selector).await?;
        let user = record.map(User::from);
        debug!(found = user.is_some(), "User lookup finished");
        Ok(user)
    }

    async fn query<R: WireRecord>(&self, selector: &Selector) -> QueryResult<Option<R>> {
        query_record(&self.transport, R::METHOD, selector, &self.cancel).await
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use userdb_ipc::MockService;

    fn alice() -> UserRecord {
        UserRecord {
            user_name: "alice".into(),
            real_name: "Alice Liddell".into(),
            uid: 1000,
            gid: 100,
            home_directory: "/home/alice".into(),
        }
    }

    #[tokio::test]
    async fn user_lookup_by_name_and_uid() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("userdb.sock");
        let service = MockService::builder()
            .reply(&alice(), false)
            .start(&socket_path)
            .await
            .unwrap();

        let resolver = Resolver::new(ResolverConfig::new(&socket_path));

        let by_name = resolver.lookup_user("alice").await.unwrap().unwrap();
        assert_eq!(by_name.username, "alice");
        assert_eq!(by_name.name, "Alice Liddell");
        assert_eq!(by_name.uid, "1000");
        assert_eq!(by_name.gid, "100");
        assert_eq!(by_name.home_dir, "/home/alice");

        let by_uid = resolver.lookup_user_id("1000").await.unwrap();
        assert_eq!(by_uid, Some(by_name));

        let request: serde_json::Value = serde_json::from_slice(&service.requests()[0]).unwrap();
        assert_eq!(request["method"], "io.systemd.UserDatabase.GetUserRecord");
    }

    #[tokio::test]
    async fn uid_compared_as_string() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("userdb.sock");
        let _service = MockService::builder()
            .reply(&alice(), false)
            .start(&socket_path)
            .await
            .unwrap();

        let resolver = Resolver::new(ResolverConfig::new(&socket_path));
        assert_eq!(resolver.lookup_user_id("01000").await.unwrap(), None);
        assert_eq!(resolver.lookup_user_id("100").await.unwrap(), None);
    }

    #[tokio::test]
    async fn cancelled_resolver_fails_with_cancellation() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("userdb.sock");
        let _service = MockService::builder()
            .hold_open()
            .start(&socket_path)
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let resolver =
            Resolver::new(ResolverConfig::new(&socket_path)).with_cancellation(cancel.clone());

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = resolver.lookup_group("wheel").await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.is_transport());
    }
}
