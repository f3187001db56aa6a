use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rocket::request::{FromRequest, Outcome, Request};

use crate::app_state::AppState;
use crate::error::{QueueError, Result};

pub const ADMIN_HEADER: &str = "X-Admin-Secret";

/// Why the last request guard rejected this request; read back by the catchers.
#[derive(Debug, Clone, Default)]
pub struct GuardFailure(pub Option<QueueError>);

fn reject<T>(req: &Request<'_>, err: QueueError) -> Outcome<T, QueueError> {
    let cached = err.clone();
    req.local_cache(move || GuardFailure(Some(cached)));
    Outcome::Error((err.status(), err))
}

fn app_state<'r>(req: &'r Request<'_>) -> Result<&'r AppState> {
    req.rocket()
        .state::<AppState>()
        .ok_or_else(|| QueueError::Config("application state is not managed".into()))
}

/// Proof that the request carried the admin shared secret.
pub struct AdminKey;

pub fn check_admin_secret(configured: Result<&str>, presented: Option<&str>) -> Result<()> {
    let expected = configured?;
    match presented {
        Some(secret) if secret == expected => Ok(()),
        _ => Err(QueueError::Auth),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminKey {
    type Error = QueueError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let checked = app_state(req).and_then(|state| {
            check_admin_secret(
                state.config.admin_secret(),
                req.headers().get_one(ADMIN_HEADER),
            )
        });

        match checked {
            Ok(()) => Outcome::Success(AdminKey),
            Err(err) => {
                log::warn!("[!] admin write to {} rejected: {}", req.uri().path(), err);
                reject(req, err)
            }
        }
    }
}

/// Passed the basic-auth challenge for the admin page.
pub struct AdminPage;

/// Splits an `Authorization: Basic ...` value into user and password.
pub fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub fn check_basic(configured: Result<(&str, &str)>, header: Option<&str>) -> Result<()> {
    let (user, pass) = configured?;
    match header.and_then(parse_basic) {
        Some((u, p)) if u == user && p == pass => Ok(()),
        _ => Err(QueueError::Auth),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminPage {
    type Error = QueueError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let checked = app_state(req).and_then(|state| {
            check_basic(
                state.config.admin_credentials(),
                req.headers().get_one("Authorization"),
            )
        });

        match checked {
            Ok(()) => Outcome::Success(AdminPage),
            Err(err) => {
                log::debug!("[-] admin page challenge: {}", err);
                reject(req, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn admin_secret_outcomes() {
        assert!(check_admin_secret(Ok("s3"), Some("s3")).is_ok());
        assert_eq!(check_admin_secret(Ok("s3"), Some("nope")), Err(QueueError::Auth));
        assert_eq!(check_admin_secret(Ok("s3"), None), Err(QueueError::Auth));
        assert!(matches!(
            check_admin_secret(Config::default().admin_secret(), Some("s3")),
            Err(QueueError::Config(_))
        ));
    }

    #[test]
    fn basic_header_parsing() {
        // "kj:mic:check" -> password may contain a colon
        let header = format!("Basic {}", STANDARD.encode("kj:mic:check"));
        assert_eq!(
            parse_basic(&header),
            Some(("kj".to_string(), "mic:check".to_string()))
        );
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
    }

    #[test]
    fn basic_check_needs_configuration() {
        let header = format!("basic {}", STANDARD.encode("kj:pw"));
        assert!(check_basic(Ok(("kj", "pw")), Some(&header)).is_ok());
        assert_eq!(check_basic(Ok(("kj", "other")), Some(&header)), Err(QueueError::Auth));
        assert_eq!(check_basic(Ok(("kj", "pw")), None), Err(QueueError::Auth));
        assert!(matches!(
            check_basic(Err(QueueError::Config("unset".into())), Some(&header)),
            Err(QueueError::Config(_))
        ));
    }
}
