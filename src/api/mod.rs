use rocket::Route;

mod admin;
pub mod auth;
mod common;
mod public;
mod student;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(auth::routes());
    routes.extend(public::routes());
    routes.extend(student::routes());
    routes.extend(voting::routes());
    routes
}
