//! One-shot request/reply exchange over a Unix domain socket

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{DEFAULT_MAX_FRAME_SIZE, FRAME_DELIMITER, FrameReader, FrameSource, TransportError};

/// Connects to the identity service, one fresh connection per exchange
#[derive(Debug, Clone)]
pub struct FramedTransport {
    socket_path: PathBuf,
    max_frame_size: usize,
}

impl FramedTransport {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Reject reply frames longer than `max_frame_size` bytes
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send `payload` followed by a NUL terminator and return the reply frames
    ///
    /// Cancelling `cancel` aborts the dial, the write, or any later frame read
    /// with [`TransportError::Cancelled`].
    pub async fn exchange(
        &self,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<FrameStream, TransportError> {
        let connect = UnixStream::connect(&self.socket_path);
        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = connect => result.map_err(|source| TransportError::Connect {
                path: self.socket_path.clone(),
                source,
            })?,
        };

        debug!(path = %self.socket_path.display(), "Connected to identity service");

        let mut message = Vec::with_capacity(payload.len() + 1);
        message.extend_from_slice(payload);
        message.push(FRAME_DELIMITER);

        let send = async {
            stream.write_all(&message).await?;
            stream.flush().await
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = send => result.map_err(TransportError::Write)?,
        }

        trace!(bytes = message.len(), "Request sent");

        Ok(FrameStream {
            frames: FrameReader::with_max_frame_size(BufReader::new(stream), self.max_frame_size),
            cancel: cancel.clone(),
        })
    }
}

/// Reply frames of a single exchange
///
/// Owns the connection; dropping the stream closes it.
pub struct FrameStream {
    frames: FrameReader<BufReader<UnixStream>>,
    cancel: CancellationToken,
}

impl FrameStream {
    /// Number of frames received so far
    pub fn frames_read(&self) -> usize {
        self.frames.frames_read()
    }
}

#[async_trait]
impl FrameSource for FrameStream {
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let Self { frames, cancel } = self;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = frames.read_frame() => result.map_err(TransportError::Read),
        }
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        trace!(frames = self.frames.frames_read(), "Closing identity service connection");
    }
}
