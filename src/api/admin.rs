use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{Admin, AuthToken},
        candidate::{CandidateDescription, CandidateSpec},
        partylist::{PartylistDescription, PartylistSpec},
        position::{PositionDescription, PositionSpec},
        settings::SettingsSpec,
        stats::ElectionReport,
        user::{UserDescription, UserSpec},
    },
    db::{
        candidate::{Candidate, CandidateCore, NewCandidate},
        partylist::{NewPartylist, Partylist},
        position::{NewPosition, Position},
        settings::{school_settings, SchoolSettings},
        user::{NewUser, User, UserCore},
        vote::{vote_counts, Vote},
    },
    mongodb::{is_duplicate_key_error, Coll, Id},
};
use crate::tally;

pub fn routes() -> Vec<Route> {
    routes![
        list_users,
        create_user,
        bulk_create_users,
        update_user,
        delete_user,
        reset_user_votes,
        list_positions,
        create_position,
        update_position,
        delete_position,
        list_candidates,
        create_candidate,
        update_candidate,
        delete_candidate,
        list_partylists,
        create_partylist,
        update_partylist,
        delete_partylist,
        get_settings,
        update_settings,
        vote_stats,
    ]
}

// --- Users ---

#[get("/users")]
async fn list_users(_token: AuthToken<Admin>, users: Coll<User>) -> Result<Json<Vec<UserDescription>>> {
    let options = FindOptions::builder()
        .sort(doc! {"reference_number": 1})
        .build();
    let users = users
        .find(None, options)
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(users))
}

#[post("/users", data = "<spec>", format = "json")]
async fn create_user(
    _token: AuthToken<Admin>,
    spec: Json<UserSpec>,
    users: Coll<User>,
) -> Result<Json<UserDescription>> {
    let user = User {
        id: Id::new(),
        user: spec.into_inner().try_into()?,
    };

    match users.insert_one(&user, None).await {
        Ok(_) => {}
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::DuplicateKey(format!(
                "A user with reference number {} already exists",
                user.reference_number
            )));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(user.into()))
}

/// Create many users at once, e.g. an imported student roster.
///
/// The insert is ordered: on the first duplicate reference number the import
/// aborts with a conflict, leaving the users before it created.
#[post("/users/bulk", data = "<specs>", format = "json")]
async fn bulk_create_users(
    _token: AuthToken<Admin>,
    specs: Json<Vec<UserSpec>>,
    users: Coll<User>,
) -> Result<Json<Vec<UserDescription>>> {
    let mut new_users = Vec::with_capacity(specs.len());
    for spec in specs.into_inner() {
        new_users.push(User {
            id: Id::new(),
            user: spec.try_into()?,
        });
    }

    match users.insert_many(&new_users, None).await {
        Ok(_) => {}
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::DuplicateKey(
                "A reference number in the import already exists".to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(new_users.into_iter().map(Into::into).collect()))
}

#[put("/users/<user_id>", data = "<spec>", format = "json")]
async fn update_user(
    _token: AuthToken<Admin>,
    user_id: Id,
    spec: Json<UserSpec>,
    users: Coll<User>,
    new_users: Coll<NewUser>,
) -> Result<Json<UserDescription>> {
    let existing = users
        .find_one(user_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with ID {}", user_id)))?;

    let spec = spec.into_inner();
    // An admin update without a password keeps the stored hash; has_voted is
    // never writable through this route.
    let core = if spec.is_admin && spec.password.is_none() {
        UserCore {
            name: spec.name,
            reference_number: spec.reference_number,
            is_admin: true,
            has_voted: existing.has_voted,
            school_level: spec.school_level,
            grade_level: spec.grade_level,
            password_hash: existing.user.password_hash,
        }
    } else {
        let mut core: UserCore = spec.try_into()?;
        core.has_voted = existing.has_voted;
        core
    };

    match new_users.replace_one(user_id.as_doc(), &core, None).await {
        Ok(_) => {}
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::DuplicateKey(format!(
                "A user with reference number {} already exists",
                core.reference_number
            )));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(User { id: user_id, user: core }.into()))
}

#[delete("/users/<user_id>")]
async fn delete_user(
    token: AuthToken<Admin>,
    user_id: Id,
    users: Coll<User>,
    votes: Coll<Vote>,
) -> Result<()> {
    if user_id == token.id {
        return Err(Error::Validation(
            "Admins cannot delete their own account".to_string(),
        ));
    }

    let result = users.delete_one(user_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("User with ID {}", user_id)));
    }

    // Their votes go with them.
    votes.delete_many(doc! {"user_id": user_id}, None).await?;
    Ok(())
}

/// Wipe a user's votes and clear their voted flag so they can vote again,
/// e.g. after a disputed or mistaken ballot.
#[post("/users/<user_id>/reset_votes")]
async fn reset_user_votes(
    _token: AuthToken<Admin>,
    user_id: Id,
    users: Coll<User>,
    votes: Coll<Vote>,
) -> Result<()> {
    let result = users
        .update_one(user_id.as_doc(), doc! {"$set": {"has_voted": false}}, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("User with ID {}", user_id)));
    }

    votes.delete_many(doc! {"user_id": user_id}, None).await?;
    Ok(())
}

// --- Positions ---

#[get("/positions")]
async fn list_positions(
    _token: AuthToken<Admin>,
    positions: Coll<Position>,
) -> Result<Json<Vec<PositionDescription>>> {
    let options = FindOptions::builder()
        .sort(doc! {"display_order": 1, "name": 1})
        .build();
    let positions = positions
        .find(None, options)
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(positions))
}

#[post("/positions", data = "<spec>", format = "json")]
async fn create_position(
    _token: AuthToken<Admin>,
    spec: Json<PositionSpec>,
    positions: Coll<Position>,
) -> Result<Json<PositionDescription>> {
    spec.validate()?;
    let position = Position {
        id: Id::new(),
        position: spec.into_inner().into(),
    };
    positions.insert_one(&position, None).await?;
    Ok(Json(position.into()))
}

#[put("/positions/<position_id>", data = "<spec>", format = "json")]
async fn update_position(
    _token: AuthToken<Admin>,
    position_id: Id,
    spec: Json<PositionSpec>,
    positions: Coll<NewPosition>,
) -> Result<Json<PositionDescription>> {
    spec.validate()?;
    let core: NewPosition = spec.into_inner().into();
    let result = positions.replace_one(position_id.as_doc(), &core, None).await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Position with ID {}", position_id)));
    }
    Ok(Json(
        Position {
            id: position_id,
            position: core,
        }
        .into(),
    ))
}

#[delete("/positions/<position_id>")]
async fn delete_position(
    _token: AuthToken<Admin>,
    position_id: Id,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
) -> Result<()> {
    let running = candidates
        .count_documents(doc! {"position_id": position_id}, None)
        .await?;
    if running > 0 {
        return Err(Error::Validation(format!(
            "Position still has {} candidates",
            running
        )));
    }

    let result = positions.delete_one(position_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("Position with ID {}", position_id)));
    }
    Ok(())
}

// --- Candidates ---

#[get("/candidates")]
async fn list_candidates(
    _token: AuthToken<Admin>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<CandidateDescription>>> {
    let candidates = candidates
        .find(None, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(candidates))
}

/// Check the references and cross-entity constraints of a candidate spec.
async fn check_candidate_spec(
    spec: &CandidateSpec,
    positions: &Coll<Position>,
    partylists: &Coll<Partylist>,
) -> Result<()> {
    spec.validate()?;

    let position = positions
        .find_one(spec.position_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Position with ID {}", spec.position_id)))?;
    partylists
        .find_one(spec.partylist_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Partylist with ID {}", spec.partylist_id)))?;

    // A candidate cannot be open to levels their position isn't.
    for level in &spec.school_levels {
        if !position.school_levels.contains(level) {
            return Err(Error::Validation(format!(
                "{} is not elected by {} students",
                position.name, level
            )));
        }
    }
    Ok(())
}

#[post("/candidates", data = "<spec>", format = "json")]
async fn create_candidate(
    _token: AuthToken<Admin>,
    spec: Json<CandidateSpec>,
    candidates: Coll<Candidate>,
    positions: Coll<Position>,
    partylists: Coll<Partylist>,
) -> Result<Json<CandidateDescription>> {
    check_candidate_spec(&spec, &positions, &partylists).await?;
    let candidate = Candidate {
        id: Id::new(),
        candidate: spec.into_inner().into(),
    };
    candidates.insert_one(&candidate, None).await?;
    Ok(Json(candidate.into()))
}

#[put("/candidates/<candidate_id>", data = "<spec>", format = "json")]
async fn update_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    spec: Json<CandidateSpec>,
    candidates: Coll<NewCandidate>,
    positions: Coll<Position>,
    partylists: Coll<Partylist>,
) -> Result<Json<CandidateDescription>> {
    check_candidate_spec(&spec, &positions, &partylists).await?;
    let core: CandidateCore = spec.into_inner().into();
    let result = candidates
        .replace_one(candidate_id.as_doc(), &core, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!(
            "Candidate with ID {}",
            candidate_id
        )));
    }
    Ok(Json(
        Candidate {
            id: candidate_id,
            candidate: core,
        }
        .into(),
    ))
}

#[delete("/candidates/<candidate_id>")]
async fn delete_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    candidates: Coll<Candidate>,
    votes: Coll<Vote>,
) -> Result<()> {
    // Removing a candidate with committed votes would silently discard them;
    // reset the affected voters first.
    let committed = votes
        .count_documents(doc! {"candidate_id": candidate_id}, None)
        .await?;
    if committed > 0 {
        return Err(Error::Validation(format!(
            "Candidate has {} committed votes",
            committed
        )));
    }

    let result = candidates.delete_one(candidate_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!(
            "Candidate with ID {}",
            candidate_id
        )));
    }
    Ok(())
}

// --- Partylists ---

#[get("/partylists")]
async fn list_partylists(
    _token: AuthToken<Admin>,
    partylists: Coll<Partylist>,
) -> Result<Json<Vec<PartylistDescription>>> {
    let partylists = partylists
        .find(None, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(partylists))
}

#[post("/partylists", data = "<spec>", format = "json")]
async fn create_partylist(
    _token: AuthToken<Admin>,
    spec: Json<PartylistSpec>,
    partylists: Coll<Partylist>,
) -> Result<Json<PartylistDescription>> {
    let partylist = Partylist {
        id: Id::new(),
        partylist: spec.into_inner().into(),
    };
    partylists.insert_one(&partylist, None).await?;
    Ok(Json(partylist.into()))
}

#[put("/partylists/<partylist_id>", data = "<spec>", format = "json")]
async fn update_partylist(
    _token: AuthToken<Admin>,
    partylist_id: Id,
    spec: Json<PartylistSpec>,
    partylists: Coll<NewPartylist>,
) -> Result<Json<PartylistDescription>> {
    let core: NewPartylist = spec.into_inner().into();
    let result = partylists
        .replace_one(partylist_id.as_doc(), &core, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!(
            "Partylist with ID {}",
            partylist_id
        )));
    }
    Ok(Json(
        Partylist {
            id: partylist_id,
            partylist: core,
        }
        .into(),
    ))
}

#[delete("/partylists/<partylist_id>")]
async fn delete_partylist(
    _token: AuthToken<Admin>,
    partylist_id: Id,
    partylists: Coll<Partylist>,
    candidates: Coll<Candidate>,
) -> Result<()> {
    let members = candidates
        .count_documents(doc! {"partylist_id": partylist_id}, None)
        .await?;
    if members > 0 {
        return Err(Error::Validation(format!(
            "Partylist still has {} candidates",
            members
        )));
    }

    let result = partylists.delete_one(partylist_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!(
            "Partylist with ID {}",
            partylist_id
        )));
    }
    Ok(())
}

// --- Settings ---

#[get("/settings")]
async fn get_settings(
    _token: AuthToken<Admin>,
    settings: Coll<SchoolSettings>,
) -> Result<Json<SchoolSettings>> {
    Ok(Json(school_settings(&settings).await?))
}

/// Replace the settings singleton wholesale.
#[put("/settings", data = "<spec>", format = "json")]
async fn update_settings(
    _token: AuthToken<Admin>,
    spec: Json<SettingsSpec>,
    settings: Coll<SchoolSettings>,
) -> Result<Json<SchoolSettings>> {
    if let (Some(start), Some(end)) = (spec.voting_start, spec.voting_end) {
        if end < start {
            return Err(Error::Validation(
                "Voting window ends before it starts".to_string(),
            ));
        }
    }

    let replacement: SchoolSettings = spec.into_inner().into();
    settings.replace_one(doc! {}, &replacement, None).await?;
    Ok(Json(replacement))
}

// --- Stats ---

/// The full tally report: participation overall and per school level, and
/// per-position, per-candidate vote counts.
#[get("/votes/stats")]
async fn vote_stats(
    _token: AuthToken<Admin>,
    users: Coll<User>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
    votes: Coll<Vote>,
) -> Result<Json<ElectionReport>> {
    let counts = vote_counts(&votes).await?;
    let users = users.find(None, None).await?.try_collect::<Vec<_>>().await?;
    let positions = positions
        .find(None, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?;
    let candidates = candidates
        .find(None, None)
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    Ok(Json(tally::election_report(
        &users,
        &positions,
        &candidates,
        &counts,
    )))
}
