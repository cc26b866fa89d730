use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::{
    common::{GradeLevel, SchoolLevel},
    mongodb::Id,
};

/// Core candidate data, as stored in the database.
///
/// `position_id` and `partylist_id` must reference existing documents; this
/// is checked by the handlers on create/update rather than by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCore {
    pub name: String,
    /// Opaque photo reference (URL or storage key); never interpreted here.
    pub photo: Option<String>,
    pub position_id: Id,
    pub partylist_id: Id,
    /// School levels whose students may vote for this candidate.
    pub school_levels: Vec<SchoolLevel>,
    /// Grades whose students may vote for this candidate.
    pub grade_levels: Vec<GradeLevel>,
}

/// A candidate without an ID.
pub type NewCandidate = CandidateCore;

/// A candidate from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub candidate: CandidateCore,
}

impl Deref for Candidate {
    type Target = CandidateCore;

    fn deref(&self) -> &Self::Target {
        &self.candidate
    }
}

impl DerefMut for Candidate {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.candidate
    }
}
