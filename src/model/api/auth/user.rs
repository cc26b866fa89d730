use std::fmt::Display;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// A marker type naming the privilege level an [`super::AuthToken`] claims.
pub trait Role {
    /// The rights of this role.
    const RIGHTS: Rights;
}

/// Different privilege levels.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Rights {
    Student = 0,
    Admin = 1,
}

impl Display for Rights {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Student => "student",
                Self::Admin => "admin",
            }
        )
    }
}

/// A signed-in student.
pub struct Student;

impl Role for Student {
    const RIGHTS: Rights = Rights::Student;
}

/// A signed-in administrator.
pub struct Admin;

impl Role for Admin {
    const RIGHTS: Rights = Rights::Admin;
}
