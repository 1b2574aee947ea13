//! Record queries
//!
//! A query sends one request and walks the reply frames in arrival order.
//! The first record accepted by the matcher is kept. Later frames are still
//! read until the service clears `continues` or closes the stream, but never
//! replace the first match. A frame that fails to decode ends the query with
//! [`ProtocolError::Decode`]: once framing is in doubt no later frame is
//! trusted.
//!
//! A varlink error reply ends the query. `NoRecordFound` means absence; any
//! other error name is returned as [`QueryError::Service`].

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use userdb_api::{NO_RECORD_FOUND, QueryRequest, RecordMatcher, ReplyEnvelope, WireRecord};

use crate::{FrameSource, FramedTransport, ProtocolError, QueryError, QueryResult};

/// Run `method` against the identity service and return the first match
pub async fn query_record<R, M>(
    transport: &FramedTransport,
    method: &str,
    matcher: &M,
    cancel: &CancellationToken,
) -> QueryResult<Option<R>>
where
    R: WireRecord,
    M: RecordMatcher<R> + ?Sized,
{
    let payload = QueryRequest::new(method)
        .to_bytes()
        .map_err(ProtocolError::Encode)?;

    debug!(
        method,
        path = %transport.socket_path().display(),
        "Sending userdb query"
    );

    let mut frames = transport.exchange(&payload, cancel).await?;
    drive(&mut frames, matcher).await
}

/// Consume reply frames from `source` until the reply ends
pub async fn drive<R, M, S>(source: &mut S, matcher: &M) -> QueryResult<Option<R>>
where
    R: WireRecord,
    M: RecordMatcher<R> + ?Sized,
    S: FrameSource + ?Sized,
{
    let mut found: Option<R> = None;
    let mut index = 0;

    while let Some(frame) = source.next_frame().await? {
        index += 1;

        let reply: ReplyEnvelope<R> = serde_json::from_slice(&frame).map_err(|err| {
            warn!(frame = index, error = %err, "Malformed userdb reply");
            ProtocolError::Decode {
                frame: index,
                source: err,
            }
        })?;

        let ReplyEnvelope {
            parameters,
            continues,
            error,
        } = reply;

        if let Some(error) = error {
            if error == NO_RECORD_FOUND {
                debug!(frame = index, "Identity service has no matching record");
                break;
            }
            warn!(frame = index, error = %error, "Identity service returned an error");
            return Err(QueryError::Service(error));
        }

        let record = parameters
            .and_then(|parameters| parameters.record)
            .ok_or(ProtocolError::MissingRecord { frame: index })?;

        if found.is_none() && matcher.matches(&record) {
            debug!(frame = index, continues, "Matched userdb record");
            found = Some(record);
        } else {
            trace!(frame = index, continues, "Skipping userdb record");
        }

        if !continues {
            break;
        }
    }

    debug!(frames = index, found = found.is_some(), "Userdb query finished");
    Ok(found)
}
