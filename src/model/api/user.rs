use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{
    common::{GradeLevel, SchoolLevel},
    db::user::{hash_password, User, UserCore},
    mongodb::Id,
};

/// An admin-supplied user to create or replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    pub reference_number: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Required iff `is_admin`; students have no password.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub school_level: Option<SchoolLevel>,
    #[serde(default)]
    pub grade_level: Option<GradeLevel>,
}

impl TryFrom<UserSpec> for UserCore {
    type Error = Error;

    fn try_from(spec: UserSpec) -> Result<Self, Self::Error> {
        let password_hash = match (spec.is_admin, spec.password) {
            (true, Some(password)) => Some(
                hash_password(password)
                    .map_err(|err| Error::Validation(format!("Unusable password: {}", err)))?,
            ),
            (true, None) => {
                return Err(Error::Validation(
                    "Admin accounts require a password".to_string(),
                ));
            }
            (false, _) => None,
        };

        Ok(Self {
            name: spec.name,
            reference_number: spec.reference_number,
            is_admin: spec.is_admin,
            has_voted: false,
            school_level: spec.school_level,
            grade_level: spec.grade_level,
            password_hash,
        })
    }
}

/// A user as reported by the API. Deliberately omits the password hash.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescription {
    pub id: Id,
    pub name: String,
    pub reference_number: String,
    pub is_admin: bool,
    pub has_voted: bool,
    pub school_level: Option<SchoolLevel>,
    pub grade_level: Option<GradeLevel>,
}

impl From<User> for UserDescription {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.user.name,
            reference_number: user.user.reference_number,
            is_admin: user.user.is_admin,
            has_voted: user.user.has_voted,
            school_level: user.user.school_level,
            grade_level: user.user.grade_level,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl UserSpec {
        pub fn example_student() -> Self {
            Self {
                name: "Crisostomo Ibarra".to_string(),
                reference_number: "2025-0100".to_string(),
                is_admin: false,
                password: None,
                school_level: Some(SchoolLevel::JuniorHigh),
                grade_level: Some(8),
            }
        }
    }
}
