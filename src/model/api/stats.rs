use serde::{Deserialize, Serialize};

use crate::model::{common::SchoolLevel, mongodb::Id};

/// The full tally report, as computed by [`crate::tally`].
///
/// All percentages are unrounded floats; rounding is the display layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionReport {
    /// Number of non-admin users.
    pub total_students: u64,
    /// Number of non-admin users who have cast at least one vote.
    pub voted_students: u64,
    /// `voted_students / total_students`, as a percentage. Zero when there
    /// are no students.
    pub participation_rate: f64,
    pub school_levels: Vec<SchoolLevelTally>,
    pub positions: Vec<PositionTally>,
}

/// Participation within one school level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolLevelTally {
    pub school_level: SchoolLevel,
    pub total_students: u64,
    pub voted_students: u64,
    pub percentage: f64,
}

/// Votes cast for one position, with the per-candidate breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTally {
    pub id: Id,
    pub name: String,
    pub votes: u64,
    /// Relative to the overall student count.
    pub percentage: f64,
    pub candidates: Vec<CandidateTally>,
}

/// Votes cast for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub id: Id,
    pub name: String,
    pub partylist_id: Id,
    pub votes: u64,
    /// Relative to the overall student count, not the position subgroup,
    /// so candidates are comparable across positions.
    pub percentage: f64,
}
