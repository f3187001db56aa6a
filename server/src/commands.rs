//! Admin commands against the shared queue.
//!
//! Each command validates its input first, then runs one store mutation
//! under the write lock and publishes the resulting snapshot before the lock
//! is released. Observers therefore see snapshots in mutation order, and a
//! rejected command leaves both the queue and the observers untouched.

use serde_json::Value;

use crate::app_state::AppState;
use crate::error::{QueueError, Result};
use crate::models::queue_item::{CurrentSong, PositionUpdate, QueueItem, SongRequest};
use crate::models::snapshot::QueueSnapshot;
use crate::models::song_queue::SongQueue;
use crate::notifier::Subscription;

async fn apply<T, F>(state: &AppState, op: F) -> Result<T>
where
    F: FnOnce(&mut SongQueue) -> Result<T>,
{
    let mut locked_song_queue = state.song_queue.write().await;
    let out = op(&mut *locked_song_queue)?;

    let snapshot = locked_song_queue.snapshot();
    state.notifier.publish(&snapshot);

    Ok(out)
}

pub async fn add(state: &AppState, request: SongRequest) -> Result<QueueItem> {
    let song = request.validate()?;
    apply(state, |queue| Ok(queue.add(song))).await
}

pub async fn advance(state: &AppState) -> Result<CurrentSong> {
    apply(state, |queue| queue.advance()).await
}

pub async fn set_current(state: &AppState, request: SongRequest) -> Result<CurrentSong> {
    let song = request.validate()?;
    apply(state, |queue| Ok(queue.set_current(song))).await
}

pub async fn clear_current(state: &AppState) -> Result<()> {
    apply(state, |queue| {
        queue.clear_current();
        Ok(())
    })
    .await
}

pub async fn remove(state: &AppState, id: u64) -> Result<QueueItem> {
    apply(state, |queue| queue.remove(id)).await
}

pub async fn reorder(state: &AppState, body: &Value) -> Result<()> {
    let updates = parse_reorder(body)?;
    apply(state, |queue| {
        queue.reorder(&updates);
        Ok(())
    })
    .await
}

/// `{items: [{id, position}, ...]}` into position updates.
pub fn parse_reorder(body: &Value) -> Result<Vec<PositionUpdate>> {
    let items = body
        .get("items")
        .ok_or_else(|| QueueError::Validation("items is required".into()))?;

    if !items.is_array() {
        return Err(QueueError::Validation("items must be a list".into()));
    }

    serde_json::from_value(items.clone()).map_err(|e| {
        QueueError::Validation(format!("items must be {{id, position}} pairs: {}", e))
    })
}

pub async fn snapshot(state: &AppState) -> QueueSnapshot {
    state.song_queue.read().await.snapshot()
}

/// Registers a new observer whose first message is the current state.
pub async fn subscribe(state: &AppState) -> Subscription {
    // holding the read lock keeps writers out until the observer is registered
    let locked_song_queue = state.song_queue.read().await;
    state.notifier.subscribe(locked_song_queue.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reorder_body_must_hold_a_list() {
        assert!(matches!(
            parse_reorder(&json!({"items": "nope"})),
            Err(QueueError::Validation(_))
        ));
        assert!(matches!(parse_reorder(&json!({})), Err(QueueError::Validation(_))));
        assert!(matches!(
            parse_reorder(&json!({"items": [{"id": 1}]})),
            Err(QueueError::Validation(_))
        ));
        assert!(matches!(
            parse_reorder(&json!({"items": [{"id": -4, "position": 1}]})),
            Err(QueueError::Validation(_))
        ));
    }

    #[test]
    fn reorder_body_parses_pairs() {
        let updates =
            parse_reorder(&json!({"items": [{"id": 2, "position": 1}, {"id": 1, "position": 2}]}))
                .unwrap();
        assert_eq!(
            updates,
            vec![
                PositionUpdate { id: 2, position: 1 },
                PositionUpdate { id: 1, position: 2 },
            ]
        );
        assert!(parse_reorder(&json!({"items": []})).unwrap().is_empty());
    }
}
