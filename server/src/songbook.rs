use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serde_json::Value;

use crate::config::Config;
use crate::error::{QueueError, Result};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only pass-through to the third-party song catalog.
#[derive(Clone)]
pub struct SongbookClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl SongbookClient {
    pub fn new(config: Arc<Config>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[!] songbook client builder failed ({}), using defaults", e);
                reqwest::Client::new()
            });

        SongbookClient { http, config }
    }

    /// Walks every upstream page and returns one flat list.
    pub async fn fetch_all(&self) -> Result<Vec<Value>> {
        let base = self.config.songbook_url()?;

        let start_time = std::time::Instant::now();
        let songs = collect_pages(
            self.config.songbook_page_size,
            self.config.songbook_max_pages,
            move |page| self.fetch_page(base, page),
        )
        .await?;

        info!(
            "[+] songbook fetched {} entries in {:?}",
            songs.len(),
            start_time.elapsed()
        );
        Ok(songs)
    }

    async fn fetch_page(&self, base: &str, page: usize) -> Result<Vec<Value>> {
        debug!("[-] songbook page {} from {}", page, base);

        let response = self
            .http
            .get(base)
            .query(&[("page", page), ("per_page", self.config.songbook_page_size)])
            .send()
            .await
            .map_err(|e| QueueError::Upstream(format!("page {}: {}", page, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueueError::Upstream(format!("page {}: HTTP {}", page, status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| QueueError::Upstream(format!("page {}: bad body: {}", page, e)))?;

        page_entries(body)
    }
}

/// Pulls the entry list out of one upstream page body.
///
/// Accepts a bare array or an object carrying it under `data`, `songs` or `items`.
pub fn page_entries(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => {
            for key in ["data", "songs", "items"] {
                if let Some(Value::Array(entries)) = map.remove(key) {
                    return Ok(entries);
                }
            }
            Err(QueueError::Upstream("page body has no entry list".into()))
        }
        other => Err(QueueError::Upstream(format!(
            "unexpected page body: {}",
            other
        ))),
    }
}

/// Fetches pages 1, 2, ... until a short page or `max_pages`, whichever comes first.
///
/// Any page failure fails the whole walk; partial lists are never returned.
pub async fn collect_pages<F, Fut>(
    page_size: usize,
    max_pages: usize,
    mut fetch: F,
) -> Result<Vec<Value>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    let mut songs = Vec::new();

    for page in 1..=max_pages {
        let entries = fetch(page).await?;
        let short_page = entries.len() < page_size;
        songs.extend(entries);

        if short_page {
            break;
        }
    }

    Ok(songs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn page_of(start: usize, len: usize) -> Vec<Value> {
        (start..start + len).map(|n| json!({ "id": n })).collect()
    }

    #[rocket::async_test]
    async fn stops_at_first_short_page() {
        let calls = RefCell::new(Vec::new());
        let songs = collect_pages(3, 10, |page| {
            calls.borrow_mut().push(page);
            let len = if page < 3 { 3 } else { 1 };
            async move { Ok(page_of((page - 1) * 3, len)) }
        })
        .await
        .unwrap();

        assert_eq!(songs.len(), 7);
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);
        assert_eq!(songs[6]["id"], 6);
    }

    #[rocket::async_test]
    async fn stops_at_page_cap() {
        let mut pages_seen = 0;
        let songs = collect_pages(2, 4, |page| {
            pages_seen += 1;
            async move { Ok(page_of(page * 2, 2)) }
        })
        .await
        .unwrap();

        assert_eq!(pages_seen, 4);
        assert_eq!(songs.len(), 8);
    }

    #[rocket::async_test]
    async fn failure_discards_partial_results() {
        let result = collect_pages(2, 5, |page| async move {
            if page == 2 {
                Err(QueueError::Upstream("HTTP 502".into()))
            } else {
                Ok(page_of(0, 2))
            }
        })
        .await;

        assert!(matches!(result, Err(QueueError::Upstream(_))));
    }

    #[test]
    fn page_entries_shapes() {
        assert_eq!(page_entries(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(page_entries(json!({"data": [1]})).unwrap().len(), 1);
        assert_eq!(page_entries(json!({"songs": []})).unwrap().len(), 0);
        assert!(page_entries(json!({"total": 3})).is_err());
        assert!(page_entries(json!("oops")).is_err());
    }

    #[rocket::async_test]
    async fn missing_url_is_config_error() {
        let client = SongbookClient::new(Arc::new(Config::default()));
        assert!(matches!(client.fetch_all().await, Err(QueueError::Config(_))));
    }
}
