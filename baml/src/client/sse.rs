//! Line classification for Server-Sent-Events bodies.

/// Prefix of every line that carries a payload.
const DATA_PREFIX: &str = "data:";

/// Payload that terminates a stream.
const DONE_SENTINEL: &str = "[DONE]";

/// What a single body line means to the stream reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SseLine<'a> {
    /// Blank lines and framing lines such as `event:` or `retry:`.
    Skip,
    /// `data: [DONE]`
    Done,
    /// The trimmed payload of any other data line.
    Data(&'a str),
}

/// Classifies one line of an event-stream body.
pub(crate) fn classify_line(line: &str) -> SseLine<'_> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return SseLine::Skip;
    }
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return SseLine::Skip;
    };
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        SseLine::Done
    } else {
        SseLine::Data(payload)
    }
}
