//! Types shared between the API and DB representations.

mod school;
mod status;

pub use school::{GradeLevel, SchoolLevel};
pub use status::ElectionStatus;
