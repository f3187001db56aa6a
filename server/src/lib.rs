#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

pub mod app_state;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod request_log;
pub mod routes;
pub mod songbook;

use crate::config::Config;

/// Assembles the whole service around a fresh, empty queue.
pub fn build(config: Config) -> Rocket<Build> {
    let app_state = app_state::initialize(config);

    rocket::build()
        .manage(app_state) // rocket::State
        .attach(request_log::RequestLogger)
        .mount("/", routes::all_routes())
        .register("/", routes::all_catchers())
}
