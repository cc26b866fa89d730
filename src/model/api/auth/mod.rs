mod request;
mod token;
mod user;

pub use request::{AdminCredentials, StudentCredentials};
pub use token::{AuthToken, AUTH_TOKEN_COOKIE};
pub use user::{Admin, Rights, Role, Student};
