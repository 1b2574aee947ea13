//! NUL-delimited frame scanning

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::TransportError;

/// Byte terminating every request and reply message
pub const FRAME_DELIMITER: u8 = 0;

/// Largest frame accepted by default, delimiter excluded
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Pull-based reader splitting a byte stream on [`FRAME_DELIMITER`]
///
/// Each frame is the bytes between two delimiters, delimiter excluded. Bytes
/// left over at end of stream without a delimiter form one final frame. A
/// frame longer than the size limit fails with [`io::ErrorKind::InvalidData`]
/// and ends the stream.
pub struct FrameReader<R> {
    reader: R,
    max_frame_size: usize,
    frames_read: usize,
    exhausted: bool,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_frame_size(reader, DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(reader: R, max_frame_size: usize) -> Self {
        Self {
            reader,
            max_frame_size,
            frames_read: 0,
            exhausted: false,
        }
    }

    /// Read the next frame, or `None` once the stream is exhausted
    pub async fn read_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.exhausted {
            return Ok(None);
        }

        let limit = self.max_frame_size;
        let mut frame = Vec::new();
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                // End of stream; any buffered bytes form an unterminated frame
                self.exhausted = true;
                if frame.is_empty() {
                    return Ok(None);
                }
                break;
            }

            let (chunk, terminated) = match available.iter().position(|&b| b == FRAME_DELIMITER) {
                Some(end) => (&available[..end], true),
                None => (available, false),
            };
            if frame.len() + chunk.len() > limit {
                self.exhausted = true;
                return Err(frame_too_long(limit));
            }
            frame.extend_from_slice(chunk);

            let consumed = chunk.len() + usize::from(terminated);
            self.reader.consume(consumed);
            if terminated {
                break;
            }
        }

        self.frames_read += 1;
        Ok(Some(frame))
    }

    /// Number of frames produced so far
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

fn frame_too_long(limit: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("reply frame exceeds {} bytes", limit),
    )
}

/// Anything that yields reply frames in arrival order
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FrameSource for FrameReader<R> {
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        self.read_frame().await.map_err(TransportError::Read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(input: &[u8]) -> Vec<Vec<u8>> {
        let mut reader = FrameReader::new(input);
        let mut frames = Vec::new();
        while let Some(frame) = reader.read_frame().await.unwrap() {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test]
    async fn splits_on_nul() {
        let frames = collect(b"alpha\0beta\0gamma\0").await;
        assert_eq!(frames, vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
    }

    #[tokio::test]
    async fn final_frame_without_delimiter() {
        let frames = collect(b"alpha\0beta").await;
        assert_eq!(frames, vec![b"alpha".to_vec(), b"beta".to_vec()]);
    }

    #[tokio::test]
    async fn joined_parts_split_back_in_order() {
        let parts: Vec<&[u8]> = vec![
            br#"{"a":1}"#,
            b"",
            b"\n newline is not a delimiter \n",
            "\u{e9}t\u{e9}".as_bytes(),
            b"last",
        ];
        let joined = parts.join(&FRAME_DELIMITER);

        let frames = collect(&joined).await;
        let expected: Vec<Vec<u8>> = parts.iter().map(|p| p.to_vec()).collect();
        assert_eq!(frames, expected);
    }

    #[tokio::test]
    async fn empty_stream_has_no_frames() {
        assert!(collect(b"").await.is_empty());
    }

    #[tokio::test]
    async fn stays_exhausted() {
        let mut reader = FrameReader::new(&b"only"[..]);
        assert_eq!(reader.read_frame().await.unwrap(), Some(b"only".to_vec()));
        assert_eq!(reader.read_frame().await.unwrap(), None);
        assert_eq!(reader.read_frame().await.unwrap(), None);
        assert_eq!(reader.frames_read(), 1);
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let mut input = vec![b'x'; 33];
        input.push(FRAME_DELIMITER);
        input.extend_from_slice(b"after");

        let buffered = tokio::io::BufReader::with_capacity(8, &input[..]);
        let mut reader = FrameReader::with_max_frame_size(buffered, 32);
        let err = reader.read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        // Nothing after an oversized frame is trusted
        assert_eq!(reader.read_frame().await.unwrap(), None);
        assert_eq!(reader.frames_read(), 0);
    }

    #[tokio::test]
    async fn unterminated_stream_hits_the_limit() {
        let input = vec![b'x'; DEFAULT_MAX_FRAME_SIZE + 1];
        let mut reader = FrameReader::new(&input[..]);

        let err = reader.read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn frame_at_the_limit_is_accepted() {
        let mut input = vec![b'x'; 32];
        input.push(FRAME_DELIMITER);

        let mut reader = FrameReader::with_max_frame_size(&input[..], 32);
        assert_eq!(reader.read_frame().await.unwrap(), Some(vec![b'x'; 32]));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }

    #[tokio::test]
    async fn frames_larger_than_buffer() {
        let big = vec![b'x'; 64 * 1024];
        let mut input = big.clone();
        input.push(FRAME_DELIMITER);
        input.extend_from_slice(b"tail");

        let buffered = tokio::io::BufReader::with_capacity(16, &input[..]);
        let mut reader = FrameReader::new(buffered);
        assert_eq!(reader.read_frame().await.unwrap(), Some(big));
        assert_eq!(reader.read_frame().await.unwrap(), Some(b"tail".to_vec()));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }
}
