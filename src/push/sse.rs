use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use thiserror::Error;

use super::LocalPushChannel;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push connection failed: {0}")]
    Connect(#[from] reqwest::Error),
    #[error("push endpoint answered {0}")]
    Status(reqwest::StatusCode),
}

/// Longest line the decoder buffers before giving up on it.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Incremental Server-Sent Events decoder. Only the `event:` field matters here, data
/// contents are ignored. As in the EventSource algorithm, a block is only dispatched when
/// it carried at least one `data:` field.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    has_data: bool,
    discarding: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of the response body and returns the names of the events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut dispatched = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.discarding {
                // Tail of an oversized line.
                self.discarding = false;
                continue;
            }
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if self.has_data {
                    dispatched.push(self.event.take().unwrap_or_else(|| "message".to_string()));
                }
                self.event = None;
                self.has_data = false;
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.has_data = true,
                _ => {}
            }
        }

        if self.buffer.len() > MAX_LINE_BYTES {
            tracing::warn!(bytes = self.buffer.len(), "Dropping oversized push line");
            self.buffer.clear();
            self.event = None;
            self.has_data = false;
            self.discarding = true;
        }

        dispatched
    }
}

pub async fn connect(url: &str, access_key: &str) -> Result<reqwest::Response, PushError> {
    let resp = reqwest::Client::new()
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .header(AUTHORIZATION, format!("Bearer {}", access_key))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PushError::Status(status));
    }
    Ok(resp)
}

/// Re-emits every event of an open SSE response on `channel` until the server closes it.
/// Returns the number of events forwarded.
pub async fn forward(resp: reqwest::Response, channel: &LocalPushChannel) -> Result<usize, PushError> {
    let mut decoder = SseDecoder::new();
    let mut body = resp.bytes_stream();
    let mut forwarded = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for event in decoder.feed(&chunk) {
            tracing::info!(event = %event, "Push event received");
            channel.emit(&event);
            forwarded += 1;
        }
    }

    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_events_are_dispatched_on_blank_line() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"event: refresh-announcements\ndata: {}\n\n");
        assert_eq!(events, vec!["refresh-announcements".to_string()]);
    }

    #[test]
    fn events_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: refresh-ann").is_empty());
        assert!(decoder.feed(b"ouncements\r\ndata:\r\n").is_empty());
        assert_eq!(decoder.feed(b"\r\n"), vec!["refresh-announcements".to_string()]);
    }

    #[test]
    fn comments_are_ignored_and_unnamed_events_default_to_message() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b": keep-alive\n\ndata: hello\n\nevent:refresh-grades\ndata\n\n");
        assert_eq!(events, vec!["message".to_string(), "refresh-grades".to_string()]);
    }

    #[test]
    fn blocks_without_data_are_not_dispatched() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: refresh-announcements\n\n").is_empty());
        assert_eq!(
            decoder.feed(b"event: refresh-announcements\ndata: 1\n\n"),
            vec!["refresh-announcements".to_string()]
        );
    }

    #[test]
    fn oversized_line_is_dropped_and_decoding_resumes() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: refresh-announcements\n").is_empty());
        assert!(decoder.feed(&vec![b'x'; MAX_LINE_BYTES + 1]).is_empty());
        assert!(decoder.buffer.is_empty());

        // The event name went with the oversized line.
        assert_eq!(decoder.feed(b"xxx\ndata: 1\n\n"), vec!["message".to_string()]);
        assert_eq!(
            decoder.feed(b"event: refresh-grades\ndata: 1\n\n"),
            vec!["refresh-grades".to_string()]
        );
    }
}
