use chrono::Utc;
use mongodb::bson::doc;
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::api::common::user_by_token;
use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{AuthToken, Student},
        vote::{VoteReceipt, VoteSpec},
    },
    db::{
        candidate::Candidate,
        position::Position,
        settings::{school_settings, SchoolSettings},
        user::User,
        vote::{NewVote, Vote},
    },
    mongodb::{is_duplicate_key_error, Coll},
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, my_votes]
}

/// Cast a vote: one candidate for one position.
///
/// The request is checked in a fixed order so each failure mode gets a
/// distinct status: voting must be open, the position and candidate must
/// exist, the candidate must actually run for the position, and the student
/// must be eligible for both. Only then is the vote written; the unique
/// index on `(user_id, position_id)` makes the final duplicate check atomic
/// with the insert, so two racing requests can never both commit.
#[post("/votes", data = "<spec>", format = "json")]
pub async fn cast_vote(
    token: AuthToken<Student>,
    spec: Json<VoteSpec>,
    users: Coll<User>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
    settings: Coll<SchoolSettings>,
    new_votes: Coll<NewVote>,
) -> Result<Json<VoteReceipt>> {
    let user = user_by_token(&token, &users).await?;

    let settings = school_settings(&settings).await?;
    if !settings.voting_open(Utc::now()) {
        return Err(Error::Validation("Voting is not open".to_string()));
    }

    let position = positions
        .find_one(spec.position_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Position with ID {}", spec.position_id)))?;

    let candidate = candidates
        .find_one(spec.candidate_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate with ID {}", spec.candidate_id)))?;

    if candidate.position_id != position.id {
        return Err(Error::Inconsistent(format!(
            "{} is not running for {}",
            candidate.name, position.name
        )));
    }

    // Re-check eligibility server-side; the ballot the client saw is advisory.
    let (school_level, grade_level) = match (user.school_level, user.grade_level) {
        (Some(level), Some(grade)) => (level, grade),
        _ => {
            return Err(Error::Validation(
                "Select your school and grade level before voting".to_string(),
            ));
        }
    };
    if !position.school_levels.contains(&school_level) {
        return Err(Error::Validation(format!(
            "{} is not elected by {} students",
            position.name, school_level
        )));
    }
    if !candidate.school_levels.contains(&school_level)
        || !candidate.grade_levels.contains(&grade_level)
    {
        return Err(Error::Validation(format!(
            "{} is not on your ballot",
            candidate.name
        )));
    }

    let vote = NewVote::new(user.id, position.id, candidate.id);
    let receipt = VoteReceipt::from(vote.clone());
    match new_votes.insert_one(&vote, None).await {
        Ok(_) => {}
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::AlreadyVoted(format!(
                "You have already voted for {}",
                position.name
            )));
        }
        Err(err) => return Err(err.into()),
    }

    // Flag the voter only after the vote is committed.
    users
        .update_one(user.id.as_doc(), doc! {"$set": {"has_voted": true}}, None)
        .await?;

    Ok(Json(receipt))
}

/// The receipts for every vote the signed-in student has cast.
#[get("/votes/mine")]
pub async fn my_votes(token: AuthToken<Student>, votes: Coll<Vote>) -> Result<Json<Vec<VoteReceipt>>> {
    let receipts = votes
        .find(doc! {"user_id": token.id}, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(|vote| vote.vote.into())
        .collect();
    Ok(Json(receipts))
}

#[cfg(test)]
mod tests {
    use mongodb::Database;
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::json,
    };
    use serde::Serialize;

    use crate::model::{
        common::{ElectionStatus, SchoolLevel},
        db::{candidate::CandidateCore, partylist::PartylistCore, position::PositionCore},
        mongodb::{Id, MongoCollection},
    };

    use super::*;

    async fn insert<T: MongoCollection + Serialize>(db: &Database, item: T) -> Id {
        Coll::<T>::from_db(db)
            .insert_one(item, None)
            .await
            .unwrap()
            .inserted_id
            .as_object_id()
            .unwrap()
            .into()
    }

    async fn open_voting(db: &Database) {
        Coll::<SchoolSettings>::from_db(db)
            .update_one(
                doc! {},
                doc! {"$set": {"status": ElectionStatus::Open}},
                None,
            )
            .await
            .unwrap();
    }

    struct Ballot {
        president: Id,
        alpha: Id,
        beta: Id,
        senior_only: Id,
    }

    async fn insert_ballot(db: &Database) -> Ballot {
        let partylist = insert(db, PartylistCore::example_unity()).await;
        let president = insert(db, PositionCore::example_president()).await;
        let alpha = insert(db, CandidateCore::example_alpha(president, partylist)).await;
        let beta = insert(db, CandidateCore::example_beta(president, partylist)).await;
        let senior_only = insert(db, CandidateCore::example_senior_only(president, partylist)).await;
        Ballot {
            president,
            alpha,
            beta,
            senior_only,
        }
    }

    async fn cast(client: &Client, position_id: Id, candidate_id: Id) -> Status {
        client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(
                json!(VoteSpec {
                    position_id,
                    candidate_id,
                })
                .to_string(),
            )
            .dispatch()
            .await
            .status()
    }

    async fn stored_votes(db: &Database) -> Vec<Vote> {
        Coll::<Vote>::from_db(db)
            .find(None, None)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap()
    }

    #[backend_test(student)]
    async fn vote_is_committed(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        let response = client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(
                json!(VoteSpec {
                    position_id: ballot.president,
                    candidate_id: ballot.alpha,
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let receipt: VoteReceipt = response.into_json().await.unwrap();
        assert_eq!(ballot.president, receipt.position_id);
        assert_eq!(ballot.alpha, receipt.candidate_id);

        let votes = stored_votes(&db).await;
        assert_eq!(1, votes.len());
        assert_eq!(ballot.alpha, votes[0].candidate_id);

        let student = Coll::<User>::from_db(&db)
            .find_one(doc! {"reference_number": "2025-0001"}, None)
            .await
            .unwrap()
            .unwrap();
        assert!(student.has_voted);
    }

    #[backend_test(student)]
    async fn second_vote_for_a_position_is_rejected(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        assert_eq!(Status::Ok, cast(&client, ballot.president, ballot.alpha).await);
        assert_eq!(
            Status::Conflict,
            cast(&client, ballot.president, ballot.beta).await
        );

        // The original vote stands untouched.
        let votes = stored_votes(&db).await;
        assert_eq!(1, votes.len());
        assert_eq!(ballot.alpha, votes[0].candidate_id);
    }

    #[backend_test(student)]
    async fn mismatched_candidate_is_rejected(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;
        let partylist = insert(&db, PartylistCore::example_progress()).await;
        let other_position = insert(&db, PositionCore::example_elementary_rep()).await;
        let other_candidate =
            insert(&db, CandidateCore::example_alpha(other_position, partylist)).await;

        assert_eq!(
            Status::BadRequest,
            cast(&client, ballot.president, other_candidate).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn unknown_position_and_candidate_are_not_found(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        assert_eq!(Status::NotFound, cast(&client, Id::new(), ballot.alpha).await);
        assert_eq!(
            Status::NotFound,
            cast(&client, ballot.president, Id::new()).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn voting_must_be_open(client: Client, db: Database) {
        // Settings stay at the seeded default: Pending.
        let ballot = insert_ballot(&db).await;

        assert_eq!(
            Status::BadRequest,
            cast(&client, ballot.president, ballot.alpha).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn ineligible_candidate_is_rejected(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        // The example student is an elementary grade 5 pupil.
        assert_eq!(
            Status::BadRequest,
            cast(&client, ballot.president, ballot.senior_only).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn ineligible_position_is_rejected(client: Client, db: Database) {
        open_voting(&db).await;
        let partylist = insert(&db, PartylistCore::example_unity()).await;
        let senior_position = insert(
            &db,
            PositionCore {
                name: "Senior High Representative".to_string(),
                max_votes: 1,
                school_levels: vec![SchoolLevel::SeniorHigh],
                display_order: 3,
            },
        )
        .await;
        let candidate = insert(
            &db,
            CandidateCore::example_senior_only(senior_position, partylist),
        )
        .await;

        assert_eq!(
            Status::BadRequest,
            cast(&client, senior_position, candidate).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn level_must_be_selected_before_voting(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        Coll::<User>::from_db(&db)
            .update_one(
                doc! {"reference_number": "2025-0001"},
                doc! {"$set": {"school_level": null, "grade_level": null}},
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            Status::BadRequest,
            cast(&client, ballot.president, ballot.alpha).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test]
    async fn voting_requires_authentication(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        assert_eq!(
            Status::Unauthorized,
            cast(&client, ballot.president, ballot.alpha).await
        );
    }

    #[backend_test(admin)]
    async fn admins_cannot_vote(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;

        assert_eq!(
            Status::Forbidden,
            cast(&client, ballot.president, ballot.alpha).await
        );
        assert!(stored_votes(&db).await.is_empty());
    }

    #[backend_test(student)]
    async fn my_votes_lists_committed_receipts(client: Client, db: Database) {
        open_voting(&db).await;
        let ballot = insert_ballot(&db).await;
        assert_eq!(Status::Ok, cast(&client, ballot.president, ballot.alpha).await);

        let response = client.get(uri!(my_votes)).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let receipts: Vec<VoteReceipt> = response.into_json().await.unwrap();
        assert_eq!(1, receipts.len());
        assert_eq!(ballot.alpha, receipts[0].candidate_id);
    }
}
