use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::{common::SchoolLevel, mongodb::Id};

/// Core position data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCore {
    /// Office name, e.g. "President".
    pub name: String,
    /// Number of open seats. Validated to be at least 1; the vote validator
    /// currently enforces a single vote per position regardless.
    pub max_votes: u32,
    /// School levels whose students elect this position.
    pub school_levels: Vec<SchoolLevel>,
    /// Ballot ordering, ascending.
    pub display_order: u32,
}

/// A position without an ID.
pub type NewPosition = PositionCore;

/// A position from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub position: PositionCore,
}

impl Deref for Position {
    type Target = PositionCore;

    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl DerefMut for Position {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.position
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl PositionCore {
        pub fn example_president() -> Self {
            Self {
                name: "President".to_string(),
                max_votes: 1,
                school_levels: SchoolLevel::ALL.to_vec(),
                display_order: 0,
            }
        }

        pub fn example_elementary_rep() -> Self {
            Self {
                name: "Elementary Representative".to_string(),
                max_votes: 1,
                school_levels: vec![SchoolLevel::Elementary],
                display_order: 1,
            }
        }
    }
}
