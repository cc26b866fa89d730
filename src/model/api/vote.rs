use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{db::vote::VoteCore, mongodb::Id};

/// A vote that the student wishes to cast: a specific candidate for a
/// specific position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSpec {
    pub position_id: Id,
    pub candidate_id: Id,
}

/// Confirmation of a committed vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub position_id: Id,
    pub candidate_id: Id,
    pub cast_at: DateTime<Utc>,
}

impl From<VoteCore> for VoteReceipt {
    fn from(vote: VoteCore) -> Self {
        Self {
            position_id: vote.position_id,
            candidate_id: vote.candidate_id,
            cast_at: vote.cast_at,
        }
    }
}
