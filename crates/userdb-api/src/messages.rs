//! Request and reply messages

use serde::{Deserialize, Serialize};

use crate::NSS_SERVICE;

/// Query sent to the identity service, one per connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub method: String,
    pub parameters: QueryParameters,
    /// Always true: the client accepts several reply frames per query
    pub more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub service: String,
}

impl QueryRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            parameters: QueryParameters {
                service: NSS_SERVICE.to_string(),
            },
            more: true,
        }
    }

    /// Serialize to the bytes written before the frame terminator
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// One decoded reply frame
///
/// A successful reply carries `parameters.record`. A failed call carries a
/// varlink `error` name instead, with empty parameters. Fields the client
/// does not use (`status`, `incomplete`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyEnvelope<R> {
    pub parameters: Option<ReplyParameters<R>>,
    /// More frames may follow; an absent flag means this is the last frame
    #[serde(default)]
    pub continues: bool,
    /// Varlink error name, e.g. `io.systemd.UserDatabase.NoRecordFound`
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyParameters<R> {
    pub record: Option<R>,
}

impl<R> ReplyEnvelope<R> {
    pub fn into_record(self) -> Option<R> {
        self.parameters.and_then(|parameters| parameters.record)
    }
}
