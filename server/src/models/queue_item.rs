use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{QueueError, Result};

/// One pending entry in the request queue.
///
/// `position` is 1-based and always matches the entry's index in the queue
/// (plus one) whenever the queue is observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: u64,
    pub song_ref: Option<String>,
    pub title: String,
    pub artist: String,
    pub position: u32,
}

/// The song being performed right now. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSong {
    pub song_ref: Option<String>,
    pub title: String,
    pub artist: String,
}

impl From<QueueItem> for CurrentSong {
    fn from(item: QueueItem) -> Self {
        // id and position belong to the queue, not to the song
        CurrentSong {
            song_ref: item.song_ref,
            title: item.title,
            artist: item.artist,
        }
    }
}

/// Inbound body for "add item" and "set current".
///
/// Everything is optional at the wire level so a missing field surfaces as
/// a ValidationError instead of a body-parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    #[serde(default, deserialize_with = "song_ref_from_any")]
    pub song_ref: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

/// A request that passed validation: title and artist are present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSong {
    pub song_ref: Option<String>,
    pub title: String,
    pub artist: String,
}

impl SongRequest {
    pub fn new(song_ref: Option<&str>, title: &str, artist: &str) -> Self {
        SongRequest {
            song_ref: song_ref.map(str::to_string),
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
        }
    }

    pub fn validate(self) -> Result<ValidSong> {
        let title = required("title", self.title)?;
        let artist = required("artist", self.artist)?;
        let song_ref = self
            .song_ref
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ValidSong {
            song_ref,
            title,
            artist,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(QueueError::Validation(format!("{} is required", field))),
    }
}

/// Catalog ids show up as strings or bare numbers depending on who sends them.
fn song_ref_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRef {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawRef>::deserialize(deserializer)? {
        Some(RawRef::Text(s)) => Some(s),
        Some(RawRef::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// One (id, desiredPosition) pair of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: u64,
    pub position: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_ref_accepts_numbers_and_strings() {
        let numeric: SongRequest =
            serde_json::from_str(r#"{"songRef": 1234, "title": "a", "artist": "b"}"#).unwrap();
        assert_eq!(numeric.song_ref.as_deref(), Some("1234"));

        let text: SongRequest =
            serde_json::from_str(r#"{"songRef": "kx-9", "title": "a", "artist": "b"}"#).unwrap();
        assert_eq!(text.song_ref.as_deref(), Some("kx-9"));

        let absent: SongRequest = serde_json::from_str(r#"{"title": "a", "artist": "b"}"#).unwrap();
        assert_eq!(absent.song_ref, None);
    }

    #[test]
    fn blank_fields_fail_validation() {
        let req = SongRequest::new(None, "   ", "Someone");
        assert!(matches!(req.validate(), Err(QueueError::Validation(_))));

        let req = SongRequest {
            title: Some("Song".into()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(QueueError::Validation(_))));
    }

    #[test]
    fn validation_trims_and_drops_blank_ref() {
        let song = SongRequest::new(Some(" "), "  Song A ", "Artist A")
            .validate()
            .unwrap();
        assert_eq!(song.title, "Song A");
        assert_eq!(song.song_ref, None);
    }

    #[test]
    fn serializes_camel_case() {
        let item = QueueItem {
            id: 3,
            song_ref: None,
            title: "t".into(),
            artist: "a".into(),
            position: 1,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("songRef").is_some());
        assert_eq!(json["position"], 1);
    }
}
