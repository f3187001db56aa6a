pub mod queue_item;
pub mod snapshot;
pub mod song_queue;
