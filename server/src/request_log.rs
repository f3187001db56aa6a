use std::time::Instant;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};

pub const STREAM_PATH: &str = "/queue/stream";

/// Logs one line per request once its response is ready.
///
/// Stream responses are ready as soon as the stream opens, so for those the
/// line marks the connect, not the end of the feed.
pub struct RequestLogger;

#[derive(Clone, Copy)]
struct Started(Option<Instant>);

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _data: &mut Data<'_>) {
        request.local_cache(|| Started(Some(Instant::now())));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let path = request.uri().path();
        let Started(started) = *request.local_cache(|| Started(None));
        let elapsed = started.map(|t| t.elapsed()).unwrap_or_default();

        if path == STREAM_PATH {
            log::info!("[+] {} {} -> {} (stream opened)", request.method(), path, response.status());
        } else {
            log::info!(
                "[-] {} {} -> {} in {:?}",
                request.method(),
                path,
                response.status(),
                elapsed
            );
        }
    }
}
