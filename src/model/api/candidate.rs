use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::{GradeLevel, SchoolLevel},
    db::candidate::{Candidate, CandidateCore},
    mongodb::Id,
};

/// An admin-supplied candidate to create or replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub position_id: Id,
    pub partylist_id: Id,
    pub school_levels: Vec<SchoolLevel>,
    pub grade_levels: Vec<GradeLevel>,
}

impl CandidateSpec {
    /// Reject structurally invalid specs. Every eligible grade must fall
    /// within one of the eligible school levels.
    pub fn validate(&self) -> Result<()> {
        if self.school_levels.is_empty() || self.grade_levels.is_empty() {
            return Err(Error::Validation(
                "A candidate must be open to at least one school level and grade".to_string(),
            ));
        }
        for &grade in &self.grade_levels {
            if !self
                .school_levels
                .iter()
                .any(|level| level.contains_grade(grade))
            {
                return Err(Error::Validation(format!(
                    "Grade {} is outside the candidate's school levels",
                    grade
                )));
            }
        }
        Ok(())
    }
}

impl From<CandidateSpec> for CandidateCore {
    fn from(spec: CandidateSpec) -> Self {
        Self {
            name: spec.name,
            photo: spec.photo,
            position_id: spec.position_id,
            partylist_id: spec.partylist_id,
            school_levels: spec.school_levels,
            grade_levels: spec.grade_levels,
        }
    }
}

/// A candidate as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDescription {
    pub id: Id,
    pub name: String,
    pub photo: Option<String>,
    pub position_id: Id,
    pub partylist_id: Id,
    pub school_levels: Vec<SchoolLevel>,
    pub grade_levels: Vec<GradeLevel>,
}

impl From<Candidate> for CandidateDescription {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.candidate.name,
            photo: candidate.candidate.photo,
            position_id: candidate.candidate.position_id,
            partylist_id: candidate.candidate.partylist_id,
            school_levels: candidate.candidate.school_levels,
            grade_levels: candidate.candidate.grade_levels,
        }
    }
}
