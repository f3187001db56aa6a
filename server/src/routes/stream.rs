use rocket::response::stream::{Event, EventStream};
use rocket::tokio::select;
use rocket::{Shutdown, State};

use crate::app_state::AppState;
use crate::commands;

/// Long-lived snapshot feed for overlay displays.
///
/// Sends the reconnection hint, then the subscribe-time snapshot, then one
/// snapshot per mutation. Dropping the stream (client gone) drops the
/// subscription, which deregisters the observer.
#[get("/queue/stream")]
async fn queue_stream(app_state: &State<AppState>, mut end: Shutdown) -> EventStream![] {
    let retry = app_state.config.retry;
    let mut subscription = commands::subscribe(app_state).await;

    EventStream! {
        yield Event::retry(retry);

        loop {
            let snapshot = select! {
                next = subscription.recv() => match next {
                    Some(snapshot) => snapshot,
                    // notifier dropped us; the client reconnects after `retry`
                    None => break,
                },
                _ = &mut end => break,
            };

            yield Event::json(&snapshot);
        }

        log::debug!("[-] stream for observer #{} closed", subscription.id());
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![queue_stream]
}
