use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while handling a request.
///
/// The first four variants are infrastructure failures; the rest are the
/// domain taxonomy, each mapped onto a fixed HTTP status by the responder.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Bson(#[from] mongodb::bson::de::Error),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    OidParse(#[from] mongodb::bson::oid::Error),
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Inconsistent vote: {0}")]
    Inconsistent(String),
    #[error("Already voted: {0}")]
    AlreadyVoted(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl Error {
    pub fn not_found(target: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} does not exist", target))
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        match self {
            Self::Db(_) | Self::Bson(_) => error!("{self}"),
            _ => warn!("{self}"),
        }
        Err(match self {
            Self::Db(_) | Self::Bson(_) => Status::InternalServerError,
            Self::Jwt(err) => match err.into_kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::OidParse(_) => Status::BadRequest,
            Self::Unauthenticated(_) => Status::Unauthorized,
            Self::Unauthorized(_) => Status::Forbidden,
            Self::NotFound(_) => Status::NotFound,
            Self::Inconsistent(_) | Self::Validation(_) => Status::BadRequest,
            Self::AlreadyVoted(_) | Self::DuplicateKey(_) => Status::Conflict,
        })
    }
}
