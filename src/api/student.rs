use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::api::common::user_by_token;
use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{AuthToken, Student},
        student::{BallotEntry, LevelSelection},
        user::UserDescription,
    },
    db::{candidate::Candidate, position::Position, user::User},
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![me, select_level, ballot]
}

/// The signed-in student's own record.
#[get("/students/me")]
pub async fn me(token: AuthToken<Student>, users: Coll<User>) -> Result<Json<UserDescription>> {
    let user = user_by_token(&token, &users).await?;
    Ok(Json(user.into()))
}

/// Record the student's school and grade level, chosen on first sign-in.
///
/// Eligibility is derived from this selection, so it is frozen once the
/// student has cast a vote.
#[put("/students/level", data = "<selection>", format = "json")]
pub async fn select_level(
    token: AuthToken<Student>,
    selection: Json<LevelSelection>,
    users: Coll<User>,
) -> Result<Json<UserDescription>> {
    selection.validate()?;

    let user = user_by_token(&token, &users).await?;
    if user.has_voted {
        return Err(Error::Validation(
            "Level cannot be changed after voting".to_string(),
        ));
    }

    users
        .update_one(
            user.id.as_doc(),
            doc! {"$set": {
                "school_level": selection.school_level,
                "grade_level": selection.grade_level as i32,
            }},
            None,
        )
        .await?;

    let updated = user_by_token(&token, &users).await?;
    Ok(Json(updated.into()))
}

/// The ballot for the signed-in student: every position their school level
/// elects, in display order, each with the candidates they may pick.
#[get("/students/ballot")]
pub async fn ballot(
    token: AuthToken<Student>,
    users: Coll<User>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<BallotEntry>>> {
    let user = user_by_token(&token, &users).await?;
    let (school_level, grade_level) = match (user.school_level, user.grade_level) {
        (Some(level), Some(grade)) => (level, grade),
        _ => {
            return Err(Error::Validation(
                "Select your school and grade level to see your ballot".to_string(),
            ));
        }
    };

    let options = FindOptions::builder()
        .sort(doc! {"display_order": 1, "name": 1})
        .build();
    let positions = positions
        .find(doc! {"school_levels": school_level}, options)
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    let mut entries = Vec::with_capacity(positions.len());
    for position in positions {
        let candidates = candidates
            .find(
                doc! {
                    "position_id": position.id,
                    "school_levels": school_level,
                    "grade_levels": grade_level as i32,
                },
                None,
            )
            .await?
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        entries.push(BallotEntry {
            position: position.into(),
            candidates,
        });
    }

    Ok(Json(entries))
}
