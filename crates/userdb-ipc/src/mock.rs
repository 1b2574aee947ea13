//! Scripted identity service for tests

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use crate::FRAME_DELIMITER;

/// Encode one reply frame (without its delimiter)
pub fn reply_frame<R: Serialize>(record: &R, continues: bool) -> Vec<u8> {
    let reply = serde_json::json!({
        "parameters": { "record": record },
        "continues": continues,
    });
    reply.to_string().into_bytes()
}

/// Encode a varlink error reply (without its delimiter)
pub fn error_frame(error: &str) -> Vec<u8> {
    let reply = serde_json::json!({
        "error": error,
        "parameters": {},
    });
    reply.to_string().into_bytes()
}

/// Builder for [`MockService`]
#[derive(Debug, Clone)]
pub struct MockServiceBuilder {
    frames: Vec<Vec<u8>>,
    trailing_delimiter: bool,
    hold_open: bool,
}

impl MockServiceBuilder {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            trailing_delimiter: true,
            hold_open: false,
        }
    }

    /// Append a raw reply frame
    pub fn frame(mut self, frame: impl Into<Vec<u8>>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Append a well-formed reply carrying `record`
    pub fn reply<R: Serialize>(self, record: &R, continues: bool) -> Self {
        self.frame(reply_frame(record, continues))
    }

    /// Append a varlink error reply
    pub fn error(self, error: &str) -> Self {
        self.frame(error_frame(error))
    }

    /// Leave the last frame unterminated
    pub fn without_trailing_delimiter(mut self) -> Self {
        self.trailing_delimiter = false;
        self
    }

    /// After the scripted frames, keep each connection open until the client
    /// hangs up, and count the hang-up
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Bind the socket and start serving
    pub async fn start(self, socket_path: impl AsRef<Path>) -> std::io::Result<MockService> {
        let socket_path = socket_path.as_ref().to_path_buf();
        let listener = UnixListener::bind(&socket_path)?;
        let (hangups, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            script: self,
            requests: Mutex::new(Vec::new()),
            hangups,
            tracked: AtomicUsize::new(0),
        });

        let state = shared.clone();
        let handle = tokio::spawn(async move {
            let mut connections = JoinSet::new();
            while let Ok((stream, _)) = listener.accept().await {
                while connections.try_join_next().is_some() {}
                connections.spawn(serve(stream, state.clone()));
                state.tracked.store(connections.len(), Ordering::Relaxed);
            }
        });

        Ok(MockService {
            socket_path,
            shared,
            handle,
        })
    }
}

struct Shared {
    script: MockServiceBuilder,
    requests: Mutex<Vec<Vec<u8>>>,
    hangups: watch::Sender<usize>,
    tracked: AtomicUsize,
}

/// Listens on a Unix socket and answers every connection with the same frames
pub struct MockService {
    socket_path: PathBuf,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl MockService {
    pub fn builder() -> MockServiceBuilder {
        MockServiceBuilder::new()
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// NUL-terminated requests received so far, terminator stripped
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.shared
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Connection tasks still held by the accept loop after the last accept
    pub fn tracked_connections(&self) -> usize {
        self.shared.tracked.load(Ordering::Relaxed)
    }

    /// Client hang-ups seen on held-open connections so far
    pub fn hangups(&self) -> usize {
        *self.shared.hangups.borrow()
    }

    /// Wait until at least `count` clients have hung up
    pub async fn wait_for_hangups(&self, count: usize) {
        let mut hangups = self.shared.hangups.subscribe();
        let _ = hangups.wait_for(|seen| *seen >= count).await;
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn serve(stream: UnixStream, shared: Arc<Shared>) {
    let mut stream = BufReader::new(stream);

    let mut request = Vec::new();
    match stream.read_until(FRAME_DELIMITER, &mut request).await {
        Ok(_) if request.last() == Some(&FRAME_DELIMITER) => {
            request.pop();
            if let Ok(mut requests) = shared.requests.lock() {
                requests.push(request);
            }
        }
        Ok(_) => {
            debug!("Mock service got an unterminated request");
            return;
        }
        Err(e) => {
            debug!(error = %e, "Mock service read error");
            return;
        }
    }

    let script = &shared.script;
    let last = script.frames.len().saturating_sub(1);
    for (i, frame) in script.frames.iter().enumerate() {
        let mut message = frame.clone();
        if i < last || script.trailing_delimiter {
            message.push(FRAME_DELIMITER);
        }
        if stream.get_mut().write_all(&message).await.is_err() {
            return;
        }
    }

    if script.hold_open {
        // EOF, or a reset when the client leaves frames unread
        let mut sink = Vec::new();
        let result = stream.read_to_end(&mut sink).await;
        debug!(ok = result.is_ok(), "Mock service client hung up");
        shared.hangups.send_modify(|seen| *seen += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdb_api::GroupRecord;

    #[test]
    fn reply_frame_shape() {
        let record = GroupRecord {
            group_name: "wheel".into(),
            gid: 10,
        };
        let frame = reply_frame(&record, true);
        let value: serde_json::Value = serde_json::from_slice(&frame).unwrap();

        assert_eq!(value["parameters"]["record"]["groupName"], "wheel");
        assert_eq!(value["parameters"]["record"]["gid"], 10);
        assert_eq!(value["continues"], true);
    }

    #[test]
    fn error_frame_shape() {
        let frame = error_frame("io.systemd.UserDatabase.NoRecordFound");
        let value: serde_json::Value = serde_json::from_slice(&frame).unwrap();

        assert_eq!(value["error"], "io.systemd.UserDatabase.NoRecordFound");
        assert_eq!(value["parameters"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn finished_connections_are_reaped() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("userdb.sock");
        let service = MockService::builder()
            .frame(b"x".to_vec())
            .start(&socket_path)
            .await
            .unwrap();

        for _ in 0..20 {
            let mut stream = UnixStream::connect(&socket_path).await.unwrap();
            stream.write_all(b"{}\0").await.unwrap();
            let mut reply = Vec::new();
            stream.read_to_end(&mut reply).await.unwrap();
            assert_eq!(reply, b"x\0");
        }

        assert_eq!(service.requests().len(), 20);
        assert_eq!(service.hangups(), 0);
        // Earlier connections finished; only the latest one or two remain
        assert!(service.tracked_connections() <= 2);
    }

    #[test]
    fn builder_defaults_to_terminated_frames() {
        let builder = MockService::builder();
        assert!(builder.trailing_delimiter);
        assert!(!builder.hold_open);
    }
}
