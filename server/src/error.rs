use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;

/// Every failure a queue command, guard or proxy call can surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Missing or malformed input
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no queued item with id {0}")]
    NotFound(u64),

    #[error("queue is empty")]
    EmptyQueue,

    /// Missing or wrong admin credential
    #[error("unauthorized")]
    Auth,

    /// The server lacks a required secret or credential
    #[error("server misconfigured: {0}")]
    Config(String),

    /// Songbook dependency failed; the detail is only ever logged
    #[error("songbook upstream failed: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl QueueError {
    pub fn status(&self) -> Status {
        match self {
            QueueError::Validation(_) | QueueError::EmptyQueue => Status::BadRequest,
            QueueError::NotFound(_) => Status::NotFound,
            QueueError::Auth => Status::Unauthorized,
            QueueError::Config(_) | QueueError::Upstream(_) => Status::InternalServerError,
        }
    }

    /// Message safe to hand back to an HTTP client.
    pub fn public_message(&self) -> String {
        match self {
            QueueError::Upstream(_) => "songbook proxy error".to_string(),
            QueueError::Config(_) => "server misconfigured".to_string(),
            other => other.to_string(),
        }
    }
}

pub fn json_body(status: Status, message: String) -> Response<'static> {
    // serializing a one-field struct of String cannot fail
    let body = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| String::from("{\"error\":\"internal error\"}"));

    Response::build()
        .status(status)
        .header(ContentType::JSON)
        .sized_body(body.len(), Cursor::new(body))
        .finalize()
}

impl<'r> Responder<'r, 'static> for QueueError {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            QueueError::Config(detail) => log::error!("[!] {}", detail),
            QueueError::Upstream(detail) => log::error!("[!] songbook upstream: {}", detail),
            other => log::debug!("[-] request rejected: {}", other),
        }
        Ok(json_body(self.status(), self.public_message()))
    }
}
