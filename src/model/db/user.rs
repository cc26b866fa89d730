use std::ops::{Deref, DerefMut};

use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::{
    common::{GradeLevel, SchoolLevel},
    mongodb::{Coll, Id},
};

/// Core user data, as stored in the database.
///
/// Students and admins share this collection; `is_admin` is what separates
/// them. Only admin accounts carry a password hash, since students sign in
/// with just their reference number.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCore {
    /// Display name.
    pub name: String,
    /// Unique login credential, e.g. a student or faculty number.
    pub reference_number: String,
    pub is_admin: bool,
    /// Set the instant the user casts their first vote on any position.
    pub has_voted: bool,
    /// Chosen on first sign-in; `None` until then (and always for admins).
    pub school_level: Option<SchoolLevel>,
    pub grade_level: Option<GradeLevel>,
    /// Argon2-encoded; never serialised out through the API layer.
    pub password_hash: Option<String>,
}

impl UserCore {
    /// Check whether the given password is correct.
    /// Always fails for accounts without a password.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        match &self.password_hash {
            Some(hash) => argon2::verify_encoded(hash, password.as_ref()).unwrap_or(false),
            None => false,
        }
    }
}

/// Hash a password for storage.
pub fn hash_password<T: AsRef<[u8]>>(password: T) -> Result<String, argon2::Error> {
    let salt: [u8; 16] = rand::random();
    argon2::hash_encoded(password.as_ref(), &salt, &argon2::Config::default())
}

/// A user without an ID.
pub type NewUser = UserCore;

/// A user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub user: UserCore,
}

impl Deref for User {
    type Target = UserCore;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.user
    }
}

/// Ensure at least one admin account exists, creating the bootstrap admin
/// from the configured password if necessary.
pub async fn ensure_admin_exists(
    users: &Coll<NewUser>,
    config: &Config,
) -> mongodb::error::Result<()> {
    let existing = users
        .count_documents(doc! {"is_admin": true}, None)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    info!("No admin account found, creating the bootstrap admin");
    let admin = NewUser {
        name: "Administrator".to_string(),
        reference_number: "admin".to_string(),
        is_admin: true,
        has_voted: false,
        school_level: None,
        grade_level: None,
        password_hash: Some(
            hash_password(config.bootstrap_password()).expect("Default argon2 config is valid"),
        ),
    };
    users.insert_one(admin, None).await?;
    Ok(())
}
