use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;

use crate::app_state::AppState;
use crate::error::Result;

#[get("/songbook")]
async fn songbook(app_state: &State<AppState>) -> Result<Json<Vec<Value>>> {
    app_state.songbook.fetch_all().await.map(Json)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![songbook]
}
