use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{GradeLevel, SchoolLevel};

use super::{candidate::CandidateDescription, position::PositionDescription};

/// A student's school level and grade selection, made on first sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSelection {
    pub school_level: SchoolLevel,
    pub grade_level: GradeLevel,
}

impl LevelSelection {
    /// The grade must fall within the chosen level.
    pub fn validate(&self) -> Result<()> {
        if !self.school_level.contains_grade(self.grade_level) {
            return Err(Error::Validation(format!(
                "Grade {} is not a {} grade",
                self.grade_level, self.school_level
            )));
        }
        Ok(())
    }
}

/// One position on a student's ballot, with the candidates they may pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    pub position: PositionDescription,
    pub candidates: Vec<CandidateDescription>,
}
