use rocket::tokio::sync::RwLock;
use std::sync::Arc;

use crate::config::Config;
use crate::models::song_queue::SongQueue;
use crate::notifier::Notifier;
use crate::songbook::SongbookClient;

#[derive(Clone)]
pub struct AppState {
    pub song_queue: Arc<RwLock<SongQueue>>,
    pub notifier: Notifier,
    pub config: Arc<Config>,
    pub songbook: SongbookClient,
}

pub fn initialize(config: Config) -> AppState {
    log::info!(
        "[+] initializing song queue (observer buffer {}, retry hint {:?})",
        config.observer_buffer,
        config.retry
    );

    let config = Arc::new(config);
    let notifier = Notifier::new(config.observer_buffer);
    let songbook = SongbookClient::new(config.clone());

    AppState {
        song_queue: Arc::new(RwLock::new(SongQueue::new())),
        notifier,
        config,
        songbook,
    }
}
