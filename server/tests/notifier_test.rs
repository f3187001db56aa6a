use karaqueue_server::app_state::{initialize, AppState};
use karaqueue_server::commands;
use karaqueue_server::config::Config;
use karaqueue_server::error::QueueError;
use karaqueue_server::models::queue_item::SongRequest;

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        initialize(Config::default())
    }

    fn song(title: &str) -> SongRequest {
        SongRequest::new(None, title, "Test Artist")
    }

    #[rocket::async_test]
    async fn test_new_observer_sees_current_state_first() {
        let state = test_state();
        commands::add(&state, song("Song A")).await.unwrap();
        commands::advance(&state).await.unwrap();
        commands::add(&state, song("Song B")).await.unwrap();

        let mut observer = commands::subscribe(&state).await;
        commands::add(&state, song("Song C")).await.unwrap();

        let first = observer.recv().await.unwrap();
        assert_eq!(first.current.map(|c| c.title), Some("Song A".to_string()));
        assert_eq!(first.queue.len(), 1);
        assert_eq!(first.next.map(|n| n.title), Some("Song B".to_string()));

        let second = observer.recv().await.unwrap();
        assert_eq!(second.queue.len(), 2);
        assert!(observer.try_recv().is_none());
    }

    #[rocket::async_test]
    async fn test_every_observer_gets_the_same_snapshot() {
        let state = test_state();
        let mut one = commands::subscribe(&state).await;
        let mut two = commands::subscribe(&state).await;
        one.recv().await.unwrap();
        two.recv().await.unwrap();

        commands::set_current(&state, song("Ad Hoc")).await.unwrap();

        let a = one.recv().await.unwrap();
        let b = two.recv().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, commands::snapshot(&state).await);
    }

    #[rocket::async_test]
    async fn test_rejected_commands_publish_nothing() {
        let state = test_state();
        let mut observer = commands::subscribe(&state).await;
        observer.recv().await.unwrap();

        assert_eq!(commands::advance(&state).await, Err(QueueError::EmptyQueue));
        assert_eq!(commands::remove(&state, 12).await, Err(QueueError::NotFound(12)));
        assert!(matches!(
            commands::add(&state, song("")).await,
            Err(QueueError::Validation(_))
        ));
        assert!(matches!(
            commands::reorder(&state, &serde_json::json!({"items": 3})).await,
            Err(QueueError::Validation(_))
        ));

        assert!(observer.try_recv().is_none());
        assert!(commands::snapshot(&state).await.queue.is_empty());
    }

    #[rocket::async_test]
    async fn test_clear_current_always_publishes() {
        let state = test_state();
        let mut observer = commands::subscribe(&state).await;
        observer.recv().await.unwrap();

        assert_eq!(commands::clear_current(&state).await, Ok(()));
        let snap = observer.recv().await.unwrap();
        assert_eq!(snap.current, None);

        // a second clear is still a success and still reaches observers
        assert_eq!(commands::clear_current(&state).await, Ok(()));
        assert_eq!(observer.recv().await.unwrap().current, None);
    }

    #[rocket::async_test]
    async fn test_departed_observers_do_not_block_the_rest() {
        let state = test_state();
        let gone = commands::subscribe(&state).await;
        let mut stays = commands::subscribe(&state).await;
        stays.recv().await.unwrap();
        assert_eq!(state.notifier.observer_count(), 2);

        drop(gone);
        assert_eq!(state.notifier.observer_count(), 1);

        commands::add(&state, song("Song A")).await.unwrap();
        let snap = stays.recv().await.unwrap();
        assert_eq!(snap.queue[0].title, "Song A");
    }
}
