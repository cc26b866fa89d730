use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, from_document};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::mongodb::{Coll, Id};

/// Core vote data, as stored in the database.
///
/// Votes are immutable once written; the unique index on
/// `(user_id, position_id)` guarantees at most one per pair system-wide.
/// They are only ever removed by the admin vote-reset operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub user_id: Id,
    pub position_id: Id,
    pub candidate_id: Id,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub cast_at: DateTime<Utc>,
}

impl VoteCore {
    /// Create a vote record timestamped now.
    pub fn new(user_id: Id, position_id: Id, candidate_id: Id) -> Self {
        Self {
            user_id,
            position_id,
            candidate_id,
            cast_at: Utc::now(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

/// The number of committed votes for one candidate of one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub position_id: Id,
    pub candidate_id: Id,
    pub count: u64,
}

/// Group the vote collection into per-(position, candidate) counts.
///
/// This is the read side of the tally: purely an aggregation, it never
/// mutates the collection.
pub async fn vote_counts(votes: &Coll<Vote>) -> Result<Vec<VoteCount>> {
    let pipeline = vec![
        doc! {
            "$group": {
                "_id": {"position": "$position_id", "candidate": "$candidate_id"},
                "count": {"$sum": 1},
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "position_id": "$_id.position",
                "candidate_id": "$_id.candidate",
                "count": 1,
            }
        },
    ];

    let documents = votes
        .aggregate(pipeline, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    let mut counts = Vec::with_capacity(documents.len());
    for document in documents {
        counts.push(from_document(document)?);
    }
    Ok(counts)
}
