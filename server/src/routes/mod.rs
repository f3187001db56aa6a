use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, Route};

use crate::auth::GuardFailure;
use crate::error::ErrorBody;

mod pages;
mod queue;
mod songbook;
mod stream;

pub fn all_routes() -> Vec<Route> {
    // Combine routes from all modules
    let mut routes = Vec::new();
    routes.extend(queue::routes());
    routes.extend(stream::routes());
    routes.extend(songbook::routes());
    routes.extend(pages::routes());
    routes
}

pub fn all_catchers() -> Vec<Catcher> {
    catchers![json_catcher]
}

/// Every error the framework produces on its own gets the same JSON shape as command errors.
#[catch(default)]
fn json_catcher(status: Status, req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    // body-parse failures are validation errors, not 422s
    let status = if status == Status::UnprocessableEntity {
        Status::BadRequest
    } else {
        status
    };

    let error = match req.local_cache(GuardFailure::default) {
        GuardFailure(Some(err)) => err.public_message(),
        GuardFailure(None) if status == Status::BadRequest => "malformed request".to_string(),
        GuardFailure(None) => status.reason_lossy().to_lowercase(),
    };

    (status, Json(ErrorBody { error }))
}
