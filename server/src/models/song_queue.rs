use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use crate::error::{QueueError, Result};
use crate::models::queue_item::{CurrentSong, PositionUpdate, QueueItem, ValidSong};
use crate::models::snapshot::QueueSnapshot;

/// Owns the pending request queue and the current-song slot.
///
/// Pure state: no locking and no I/O. Callers serialize access (see
/// `AppState`). Every structural mutation renumbers positions to `1..N`
/// before returning, so positions are never observed with gaps.
pub struct SongQueue {
    inner: VecDeque<QueueItem>,
    current: Option<CurrentSong>,
    next_id: u64,
}

impl Default for SongQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SongQueue {
    pub fn new() -> Self {
        Self {
            inner: VecDeque::new(),
            current: None,
            next_id: 1,
        }
    }

    /// Appends a request at the tail. Ids come from a counter that never rewinds.
    pub fn add(&mut self, song: ValidSong) -> QueueItem {
        let id = self.next_id;
        self.next_id += 1;

        let item = QueueItem {
            id,
            song_ref: song.song_ref,
            title: song.title,
            artist: song.artist,
            position: self.inner.len() as u32 + 1,
        };
        self.inner.push_back(item.clone());

        info!(
            "[+] queued #{} '{}' by {} at position {}",
            item.id, item.title, item.artist, item.position
        );
        item
    }

    /// Promotes the head of the queue to the current song.
    pub fn advance(&mut self) -> Result<CurrentSong> {
        let head = self.inner.pop_front().ok_or(QueueError::EmptyQueue)?;
        self.renumber();

        let current = CurrentSong::from(head);
        info!(
            "[+] now playing '{}' by {} ({} left in queue)",
            current.title,
            current.artist,
            self.inner.len()
        );
        self.current = Some(current.clone());
        Ok(current)
    }

    /// Overwrites the current song without touching the queue.
    pub fn set_current(&mut self, song: ValidSong) -> CurrentSong {
        let current = CurrentSong {
            song_ref: song.song_ref,
            title: song.title,
            artist: song.artist,
        };
        info!("[+] current set to '{}' by {}", current.title, current.artist);
        self.current = Some(current.clone());
        current
    }

    pub fn clear_current(&mut self) {
        if self.current.take().is_some() {
            info!("[+] current song cleared");
        } else {
            debug!("[-] clear_current on an already empty slot");
        }
    }

    pub fn remove(&mut self, id: u64) -> Result<QueueItem> {
        let index = self
            .inner
            .iter()
            .position(|item| item.id == id)
            .ok_or(QueueError::NotFound(id))?;

        // index came from the same deque, so this is always Some
        let removed = self.inner.remove(index).ok_or(QueueError::NotFound(id))?;
        self.renumber();

        info!("[+] removed #{} '{}' from queue", removed.id, removed.title);
        Ok(removed)
    }

    /// Applies the requested positions, stable-sorts by position and renumbers.
    ///
    /// Ids that are not queued are ignored; a repeated id takes its last
    /// position. Items that are not mentioned keep their current position, and
    /// ties keep their previous relative order.
    pub fn reorder(&mut self, updates: &[PositionUpdate]) {
        let wanted: HashMap<u64, i64> = updates.iter().map(|u| (u.id, u.position)).collect();

        let mut keyed: Vec<(i64, QueueItem)> = self
            .inner
            .drain(..)
            .map(|item| {
                let position = wanted
                    .get(&item.id)
                    .copied()
                    .unwrap_or(i64::from(item.position));
                (position, item)
            })
            .collect();

        // sort_by_key is stable, so equal positions keep their old order
        keyed.sort_by_key(|(position, _)| *position);

        self.inner = keyed.into_iter().map(|(_, item)| item).collect();
        self.renumber();

        info!(
            "[+] reordered queue with {} update(s), {} item(s) queued",
            updates.len(),
            self.inner.len()
        );
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot::build(self.current.as_ref(), self.inner.iter())
    }

    pub fn current(&self) -> Option<&CurrentSong> {
        self.current.as_ref()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn renumber(&mut self) {
        for (index, item) in self.inner.iter_mut().enumerate() {
            item.position = index as u32 + 1;
        }
    }
}
