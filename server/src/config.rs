use std::env;
use std::time::Duration;

use log::{info, warn};

use crate::error::{QueueError, Result};

/// Runtime settings, read once from the environment at boot.
///
/// Missing secrets are kept as `None` instead of failing boot: the affected
/// endpoints answer with a ConfigError so the public display keeps working.
#[derive(Debug, Clone)]
pub struct Config {
    pub admin_secret: Option<String>,
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,
    pub songbook_url: Option<String>,
    pub songbook_page_size: usize,
    pub songbook_max_pages: usize,
    pub observer_buffer: usize,
    pub retry: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            admin_secret: None,
            admin_user: None,
            admin_pass: None,
            songbook_url: None,
            songbook_page_size: 100,
            songbook_max_pages: 20,
            observer_buffer: 16,
            retry: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, fallback: usize| match text(key) {
            Some(raw) => raw.trim().parse::<usize>().ok().filter(|n| *n > 0).unwrap_or_else(|| {
                warn!("[!] ignoring bad value {:?} for {}, using {}", raw, key, fallback);
                fallback
            }),
            None => fallback,
        };

        let config = Config {
            admin_secret: text("KARAQUEUE_ADMIN_SECRET"),
            admin_user: text("KARAQUEUE_ADMIN_USER"),
            admin_pass: text("KARAQUEUE_ADMIN_PASS"),
            songbook_url: text("KARAQUEUE_SONGBOOK_URL"),
            songbook_page_size: number("KARAQUEUE_SONGBOOK_PAGE_SIZE", defaults.songbook_page_size),
            songbook_max_pages: number("KARAQUEUE_SONGBOOK_MAX_PAGES", defaults.songbook_max_pages),
            observer_buffer: number("KARAQUEUE_OBSERVER_BUFFER", defaults.observer_buffer),
            retry: Duration::from_millis(
                number("KARAQUEUE_RETRY_MS", defaults.retry.as_millis() as usize) as u64,
            ),
        };

        if config.admin_secret.is_none() {
            warn!("[!] KARAQUEUE_ADMIN_SECRET is not set, admin writes will fail");
        }
        if config.songbook_url.is_none() {
            info!("[-] KARAQUEUE_SONGBOOK_URL is not set, /songbook is disabled");
        }
        config
    }

    pub fn admin_secret(&self) -> Result<&str> {
        self.admin_secret
            .as_deref()
            .ok_or_else(|| QueueError::Config("KARAQUEUE_ADMIN_SECRET is not set".into()))
    }

    pub fn admin_credentials(&self) -> Result<(&str, &str)> {
        match (self.admin_user.as_deref(), self.admin_pass.as_deref()) {
            (Some(user), Some(pass)) => Ok((user, pass)),
            _ => Err(QueueError::Config(
                "KARAQUEUE_ADMIN_USER / KARAQUEUE_ADMIN_PASS are not set".into(),
            )),
        }
    }

    pub fn songbook_url(&self) -> Result<&str> {
        self.songbook_url
            .as_deref()
            .ok_or_else(|| QueueError::Config("KARAQUEUE_SONGBOOK_URL is not set".into()))
    }
}
