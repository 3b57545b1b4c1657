//! Server-sent event decoding shared by the streaming backends.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::{stream, Stream, StreamExt};
use layoutforge_core::{FragmentStream, ProviderError};

/// Incremental `text/event-stream` decoder.
///
/// Bytes may arrive split anywhere, including inside a multi-byte character;
/// only complete lines are decoded. Yields the `data` payload of each event,
/// with multi-line data joined by `\n`.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            self.handle_line(line.trim_end_matches(['\n', '\r']), &mut events);
        }
        events
    }

    /// Flush a trailing unterminated line and any undispatched event.
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            self.handle_line(line.trim_end_matches('\r'), &mut events);
        }
        self.dispatch(&mut events);
        events
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
    }

    fn dispatch(&mut self, events: &mut Vec<String>) {
        if !self.data.is_empty() {
            events.push(self.data.join("\n"));
            self.data.clear();
        }
    }
}

/// What one event payload means to a backend.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Payload {
    Fragment(String),
    Skip,
    Done,
}

pub(crate) type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send>>;

struct State<F> {
    provider: &'static str,
    bytes: ByteStream,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    parse: F,
    eof: bool,
    done: bool,
}

/// Turn an SSE response body into a stream of text fragments.
pub(crate) fn fragment_stream<F>(provider: &'static str, response: reqwest::Response, parse: F) -> FragmentStream
where
    F: Fn(&str) -> Result<Payload, ProviderError> + Send + 'static,
{
    let bytes: ByteStream = Box::pin(response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())));
    decode_stream(provider, bytes, parse)
}

pub(crate) fn decode_stream<F>(provider: &'static str, bytes: ByteStream, parse: F) -> FragmentStream
where
    F: Fn(&str) -> Result<Payload, ProviderError> + Send + 'static,
{
    let state = State {
        provider,
        bytes,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        parse,
        eof: false,
        done: false,
    };

    let fragments = stream::unfold(state, |mut st| async move {
        loop {
            if st.done {
                return None;
            }
            if let Some(data) = st.pending.pop_front() {
                match (st.parse)(&data) {
                    Ok(Payload::Fragment(text)) => return Some((Ok(text), st)),
                    Ok(Payload::Skip) => continue,
                    Ok(Payload::Done) => {
                        st.done = true;
                        return None;
                    }
                    Err(err) => {
                        st.done = true;
                        return Some((Err(err), st));
                    }
                }
            }
            if st.eof {
                return None;
            }
            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = st.decoder.push(&chunk);
                    st.pending.extend(events);
                }
                Some(Err(err)) => {
                    st.done = true;
                    let err = ProviderError::Unreachable {
                        provider: st.provider.to_string(),
                        message: format!("stream interrupted: {err}"),
                    };
                    return Some((Err(err), st));
                }
                None => {
                    st.eof = true;
                    let events = st.decoder.finish();
                    st.pending.extend(events);
                }
            }
        }
    });
    Box::pin(fragments.fuse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_events_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        assert!(decoder.push(b":1}\n").is_empty());
        assert_eq!(decoder.push(b"\ndata: two\n\n"), vec!["{\"a\":1}", "two"]);
    }

    #[test]
    fn joins_multiline_data_and_skips_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\nevent: message\ndata: a\r\ndata: b\r\n\r\n");
        assert_eq!(events, vec!["a\nb"]);
    }

    #[test]
    fn handles_multibyte_split() {
        let bytes = "data: 排版\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..8]).is_empty());
        assert_eq!(decoder.push(&bytes[8..]), vec!["排版"]);
    }

    #[test]
    fn finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
        assert!(decoder.finish().is_empty());
    }

    fn parse_plain(data: &str) -> Result<Payload, ProviderError> {
        Ok(match data {
            "[DONE]" => Payload::Done,
            "" => Payload::Skip,
            text => Payload::Fragment(text.to_string()),
        })
    }

    #[tokio::test]
    async fn stream_stops_at_done_marker() {
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> = vec![
            Ok(b"data: Hel".to_vec()),
            Ok(b"lo\n\ndata: \n\ndata: world\n\n".to_vec()),
            Ok(b"data: [DONE]\n\ndata: ignored\n\n".to_vec()),
        ];
        let fragments: Vec<_> = decode_stream("test", Box::pin(stream::iter(chunks)), parse_plain)
            .collect()
            .await;
        let fragments: Vec<String> = fragments.into_iter().map(Result::unwrap).collect();
        assert_eq!(fragments, vec!["Hello", "world"]);
    }

    #[tokio::test]
    async fn stream_ends_at_body_end_and_stays_ended() {
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> = vec![Ok(b"data: only".to_vec())];
        let mut fragments = decode_stream("test", Box::pin(stream::iter(chunks)), parse_plain);
        assert_eq!(fragments.next().await.unwrap().unwrap(), "only");
        assert!(fragments.next().await.is_none());
        assert!(fragments.next().await.is_none());
    }
}
