use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::State;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::auth::AdminKey;
use crate::commands;
use crate::error::{QueueError, Result};
use crate::models::queue_item::{CurrentSong, QueueItem, SongRequest};
use crate::models::snapshot::QueueSnapshot;

// Taking the body as a Result keeps parse failures inside the error taxonomy
fn parsed<T>(body: std::result::Result<Json<T>, json::Error<'_>>) -> Result<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(json::Error::Io(e)) => Err(QueueError::Validation(format!("unreadable body: {}", e))),
        Err(json::Error::Parse(_, e)) => Err(QueueError::Validation(format!("malformed JSON: {}", e))),
    }
}

#[get("/queue")]
async fn get_queue(app_state: &State<AppState>) -> Json<QueueSnapshot> {
    Json(commands::snapshot(app_state).await)
}

#[post("/queue/add", data = "<body>")]
async fn add_item(
    _admin: AdminKey,
    app_state: &State<AppState>,
    body: std::result::Result<Json<SongRequest>, json::Error<'_>>,
) -> Result<(Status, Json<QueueItem>)> {
    let item = commands::add(app_state, parsed(body)?).await?;
    Ok((Status::Created, Json(item)))
}

#[post("/queue/advance")]
async fn advance(_admin: AdminKey, app_state: &State<AppState>) -> Result<Json<CurrentSong>> {
    commands::advance(app_state).await.map(Json)
}

#[post("/queue/current", data = "<body>")]
async fn set_current(
    _admin: AdminKey,
    app_state: &State<AppState>,
    body: std::result::Result<Json<SongRequest>, json::Error<'_>>,
) -> Result<Json<CurrentSong>> {
    commands::set_current(app_state, parsed(body)?).await.map(Json)
}

#[post("/queue/current/clear")]
async fn clear_current(_admin: AdminKey, app_state: &State<AppState>) -> Result<Json<Value>> {
    commands::clear_current(app_state).await?;
    Ok(Json(json!({ "current": null })))
}

#[delete("/queue/<id>")]
async fn delete_item(_admin: AdminKey, app_state: &State<AppState>, id: u64) -> Result<Json<Value>> {
    commands::remove(app_state, id).await?;
    Ok(Json(json!({ "success": true })))
}

#[post("/queue/reorder", data = "<body>")]
async fn reorder(
    _admin: AdminKey,
    app_state: &State<AppState>,
    body: std::result::Result<Json<Value>, json::Error<'_>>,
) -> Result<Json<Value>> {
    commands::reorder(app_state, &parsed(body)?).await?;
    Ok(Json(json!({ "success": true })))
}

// Return routes defined in this module
pub fn routes() -> Vec<rocket::Route> {
    routes![
        get_queue,
        add_item,
        advance,
        set_current,
        clear_current,
        delete_item,
        reorder
    ]
}
