use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSong {
    pub song_ref: Option<String>,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: u64,
    pub song_ref: Option<String>,
    pub title: String,
    pub artist: String,
    pub position: u32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueueSnapshot {
    pub current: Option<CurrentSong>,
    pub next: Option<QueueItem>,
    pub queue: Vec<QueueItem>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl fmt::Display for CurrentSong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)?;
        if let Some(song_ref) = &self.song_ref {
            write!(f, " [#{}]", song_ref)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)?;
        if let Some(song_ref) = &self.song_ref {
            write!(f, " [#{}]", song_ref)?;
        }
        Ok(())
    }
}

/// Pulls the JSON payload out of one server-sent event block.
///
/// Returns `None` for blocks without data (retry hints, heartbeats).
pub fn event_data(block: &str) -> Option<String> {
    let lines: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Reassembles server-sent events from raw network chunks.
///
/// Bytes are held until a whole event has arrived, so a character split
/// across two chunks is decoded intact.
#[derive(Debug, Default)]
pub struct EventFramer {
    pending: Vec<u8>,
}

impl EventFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the data payload of every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut payloads = Vec::new();

        // events are separated by a blank line
        while let Some(end) = self.pending.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.pending.drain(..end + 2).collect();
            match String::from_utf8(block) {
                Ok(text) => payloads.extend(event_data(&text)),
                Err(e) => log::warn!("[!] dropping event that is not UTF-8: {}", e),
            }
        }

        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snapshot() {
        let body = r#"{"current":null,"next":{"id":2,"songRef":"77","title":"B","artist":"Y","position":1},
                       "queue":[{"id":2,"songRef":"77","title":"B","artist":"Y","position":1}]}"#;
        let snap: QueueSnapshot = serde_json::from_str(body).unwrap();
        assert!(snap.current.is_none());
        assert_eq!(snap.queue[0].to_string(), "B - Y [#77]");
    }

    #[test]
    fn event_data_skips_hints() {
        assert_eq!(event_data("retry:5000"), None);
        assert_eq!(event_data(":"), None);
        assert_eq!(event_data("data:{\"a\":1}"), Some("{\"a\":1}".to_string()));
        assert_eq!(event_data("data: x\ndata: y"), Some("x\ny".to_string()));
    }

    #[test]
    fn framer_keeps_split_characters_whole() {
        let event = "data:{\"title\":\"사랑\",\"artist\":\"아이유\"}\n\n".as_bytes();
        // split the first multibyte character across two chunks
        let cut = event.iter().position(|b| *b >= 0x80).unwrap() + 1;

        let mut framer = EventFramer::new();
        assert!(framer.push(&event[..cut]).is_empty());
        let payloads = framer.push(&event[cut..]);

        assert_eq!(payloads.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&payloads[0]).unwrap();
        assert_eq!(value["title"], "사랑");
        assert_eq!(value["artist"], "아이유");
    }

    #[test]
    fn framer_skips_hints_and_keeps_partial_tail() {
        let mut framer = EventFramer::new();
        let payloads = framer.push(b"retry:5000\n\ndata:{\"a\":1}\n\ndata:{\"a\"");
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);

        assert_eq!(framer.push(b":2}\n\n"), vec!["{\"a\":2}".to_string()]);
        assert!(framer.push(b"").is_empty());
    }
}
