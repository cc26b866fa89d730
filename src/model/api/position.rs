use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::SchoolLevel,
    db::position::{Position, PositionCore},
    mongodb::Id,
};

/// An admin-supplied position to create or replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSpec {
    pub name: String,
    pub max_votes: u32,
    pub school_levels: Vec<SchoolLevel>,
    #[serde(default)]
    pub display_order: u32,
}

impl PositionSpec {
    /// Reject structurally invalid specs.
    pub fn validate(&self) -> Result<()> {
        if self.max_votes < 1 {
            return Err(Error::Validation(
                "A position must allow at least one vote".to_string(),
            ));
        }
        if self.school_levels.is_empty() {
            return Err(Error::Validation(
                "A position must be open to at least one school level".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<PositionSpec> for PositionCore {
    fn from(spec: PositionSpec) -> Self {
        Self {
            name: spec.name,
            max_votes: spec.max_votes,
            school_levels: spec.school_levels,
            display_order: spec.display_order,
        }
    }
}

/// A position as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDescription {
    pub id: Id,
    pub name: String,
    pub max_votes: u32,
    pub school_levels: Vec<SchoolLevel>,
    pub display_order: u32,
}

impl From<Position> for PositionDescription {
    fn from(position: Position) -> Self {
        Self {
            id: position.id,
            name: position.position.name,
            max_votes: position.position.max_votes,
            school_levels: position.position.school_levels,
            display_order: position.position.display_order,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl PositionSpec {
        pub fn example_secretary() -> Self {
            Self {
                name: "Secretary".to_string(),
                max_votes: 1,
                school_levels: SchoolLevel::ALL.to_vec(),
                display_order: 2,
            }
        }
    }
}
