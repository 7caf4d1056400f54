//! Filter stream listener. Turns the newline-delimited JSON body into
//! [`FeedEvent`]s; the stream ends when the connection does.

use async_stream::stream;
use bytes::{Buf, BytesMut};
use futures::{Stream, StreamExt};
use std::sync::Arc;

use super::client::{RawStatus, TwitterClient};
use crate::domain::error::{ErrorKind, FeedError};
use crate::domain::types::FeedEvent;

/// Splits a chunked byte body into complete lines. Bytes are buffered
/// until a newline arrives, so multibyte characters split across chunks
/// survive.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
}

impl LineDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos);
            self.buffer.advance(1);
            lines.push(String::from_utf8_lossy(&line).trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        Some(String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string())
    }
}

/// `None` for keep-alive blank lines and non-status notices
/// (`delete`, `limit`, `warning`, ...).
pub fn parse_line(line: &str) -> Option<FeedEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return Some(FeedEvent::Error(e.into())),
    };
    if value.get("id").is_none() || value.get("user").is_none() {
        tracing::debug!("Ignoring stream notice: {}", line);
        return None;
    }

    match serde_json::from_value::<RawStatus>(value) {
        Ok(status) => Some(FeedEvent::Status(status.into_message())),
        Err(e) => Some(FeedEvent::Error(e.into())),
    }
}

/// Connects to the filter stream tracking `track` and yields every status
/// that mentions it. A failed connect or a broken body yields one
/// `FeedEvent::Error` and ends the stream.
pub fn listen(client: Arc<TwitterClient>, track: String) -> impl Stream<Item = FeedEvent> {
    stream! {
        let response = match client.open_stream(&track).await {
            Ok(response) => response,
            Err(e) => {
                yield FeedEvent::Error(e);
                return;
            }
        };

        let mut body = response.bytes_stream();
        let mut decoder = LineDecoder::default();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => {
                    for line in decoder.push(&chunk) {
                        if let Some(event) = parse_line(&line) {
                            yield event;
                        }
                    }
                }
                Err(e) => {
                    yield FeedEvent::Error(FeedError::new(ErrorKind::Transport, e.to_string()));
                    return;
                }
            }
        }

        if let Some(event) = decoder.finish().as_deref().and_then(parse_line) {
            yield event;
        }
    }
}
