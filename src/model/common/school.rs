use std::fmt::Display;
use std::ops::RangeInclusive;

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// A grade number. Grades 1-12 are partitioned between the school levels.
pub type GradeLevel = u8;

/// The three school levels, each mapped to a fixed grade range.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchoolLevel {
    Elementary,
    JuniorHigh,
    SeniorHigh,
}

impl SchoolLevel {
    /// All levels, in ascending grade order.
    pub const ALL: [SchoolLevel; 3] = [Self::Elementary, Self::JuniorHigh, Self::SeniorHigh];

    /// The grades belonging to this level.
    pub fn grades(self) -> RangeInclusive<GradeLevel> {
        match self {
            Self::Elementary => 1..=6,
            Self::JuniorHigh => 7..=10,
            Self::SeniorHigh => 11..=12,
        }
    }

    /// Does the given grade fall within this level?
    pub fn contains_grade(self, grade: GradeLevel) -> bool {
        self.grades().contains(&grade)
    }
}

impl Display for SchoolLevel {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Elementary => "elementary",
                Self::JuniorHigh => "junior high",
                Self::SeniorHigh => "senior high",
            }
        )
    }
}

impl From<SchoolLevel> for Bson {
    fn from(level: SchoolLevel) -> Self {
        to_bson(&level).expect("Serialisation is infallible")
    }
}
