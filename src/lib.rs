#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod tally;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, DatabaseFairing};
use crate::logging::LoggerFairing;

/// Assemble the rocket: config first (the database fairing reads it), then
/// the database, then request logging, and finally the routes.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
        .mount("/", api::routes())
}

/// Get a local client for, and direct access to the database of, a freshly
/// built instance. Each test instance uses its own randomly named database.
#[cfg(test)]
pub(crate) async fn client_and_db() -> (rocket::local::asynchronous::Client, mongodb::Database) {
    log4rs_test_utils::test_logging::init_logging_once_for(["schoolvote_backend"], None, None);

    let client = rocket::local::asynchronous::Client::tracked(build())
        .await
        .expect("Failed to build test instance");
    let db = client
        .rocket()
        .state::<mongodb::Database>()
        .expect("Database is always managed")
        .clone();
    (client, db)
}
