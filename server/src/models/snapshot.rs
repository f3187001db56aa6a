use serde::{Deserialize, Serialize};

use crate::models::queue_item::{CurrentSong, QueueItem};

/// Immutable read view of the queue, as served by `GET /queue` and pushed to observers.
///
/// `next` is derived from `queue` and never stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub current: Option<CurrentSong>,
    pub next: Option<QueueItem>,
    pub queue: Vec<QueueItem>,
}

impl QueueSnapshot {
    pub fn build<'a, I>(current: Option<&CurrentSong>, items: I) -> Self
    where
        I: IntoIterator<Item = &'a QueueItem>,
    {
        let queue: Vec<QueueItem> = items.into_iter().cloned().collect();
        QueueSnapshot {
            current: current.cloned(),
            next: queue.first().cloned(),
            queue,
        }
    }

    pub fn empty() -> Self {
        QueueSnapshot {
            current: None,
            next: None,
            queue: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_mirrors_head() {
        let items = vec![
            QueueItem {
                id: 7,
                song_ref: None,
                title: "Song A".into(),
                artist: "Artist A".into(),
                position: 1,
            },
            QueueItem {
                id: 8,
                song_ref: Some("42".into()),
                title: "Song B".into(),
                artist: "Artist B".into(),
                position: 2,
            },
        ];

        let snap = QueueSnapshot::build(None, &items);
        assert_eq!(snap.next.as_ref(), snap.queue.first());
        assert_eq!(snap.next.map(|n| n.id), Some(7));

        let empty = QueueSnapshot::build(None, &[]);
        assert_eq!(empty, QueueSnapshot::empty());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let json = serde_json::to_value(QueueSnapshot::empty()).unwrap();
        assert!(json["current"].is_null());
        assert!(json["next"].is_null());
        assert_eq!(json["queue"], serde_json::json!([]));
    }
}
