use crate::error::{Error, Result};
use crate::model::{
    api::auth::{AuthToken, Role},
    db::User,
    mongodb::Coll,
};

/// Look up the user behind a verified token.
///
/// The token guard checks that the user exists, but they may have been
/// deleted between then and now, so a missing user is still an error here.
pub async fn user_by_token<R: Role>(token: &AuthToken<R>, users: &Coll<User>) -> Result<User> {
    users
        .find_one(token.id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with ID {}", token.id)))
}
