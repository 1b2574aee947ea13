//! Client side of the userdb NameServiceSwitch protocol
//!
//! Provides:
//! - NUL-delimited frame scanning over any async byte source
//! - One-shot Unix domain socket exchange (one connection per query)
//! - Record queries honouring the `continues` flag
//! - A scripted mock service for tests

mod frame;
mod mock;
mod query;
mod transport;

pub use frame::*;
pub use mock::*;
pub use query::*;
pub use transport::*;

use std::path::PathBuf;
use thiserror::Error;

/// Failures reaching or talking to the identity service
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to send request: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to read reply: {0}")]
    Read(#[source] std::io::Error),

    #[error("Query cancelled")]
    Cancelled,
}

/// A message that could not be encoded or decoded
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed reply frame {frame}: {source}")]
    Decode {
        /// 1-based position of the frame in the reply stream
        frame: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reply frame {frame} carries neither a record nor an error")]
    MissingRecord { frame: usize },
}

/// Query errors. "No such record" is not one of them.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The service answered with a varlink error other than "no record found"
    #[error("Identity service error: {0}")]
    Service(String),
}

impl QueryError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Cancelled))
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
