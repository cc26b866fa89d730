use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar},
    serde::json::Json,
    Route, State,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    api::auth::{Admin, AdminCredentials, AuthToken, Student, StudentCredentials, AUTH_TOKEN_COOKIE},
    db::user::User,
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![admin_login, student_login, logout]
}

/// Sign in as an admin with a reference number and password.
#[post("/auth/admin", data = "<credentials>", format = "json")]
pub async fn admin_login(
    credentials: Json<AdminCredentials>,
    cookies: &CookieJar<'_>,
    users: Coll<User>,
    config: &State<Config>,
) -> Result<()> {
    let admin = users
        .find_one(
            doc! {
                "reference_number": &credentials.reference_number,
                "is_admin": true,
            },
            None,
        )
        .await?
        // Deliberately indistinguishable from a wrong password below.
        .ok_or_else(|| Error::Unauthenticated("Invalid credentials".to_string()))?;

    if !admin.verify_password(&credentials.password) {
        return Err(Error::Unauthenticated("Invalid credentials".to_string()));
    }

    let token = AuthToken::<Admin>::new(&admin);
    cookies.add(token.into_cookie(config));
    Ok(())
}

/// Sign in as a student. The reference number is the whole credential.
#[post("/auth/student", data = "<credentials>", format = "json")]
pub async fn student_login(
    credentials: Json<StudentCredentials>,
    cookies: &CookieJar<'_>,
    users: Coll<User>,
    config: &State<Config>,
) -> Result<()> {
    let student = users
        .find_one(
            doc! {
                "reference_number": &credentials.reference_number,
                "is_admin": false,
            },
            None,
        )
        .await?
        .ok_or_else(|| {
            Error::Unauthenticated(format!(
                "No student with reference number {}",
                credentials.reference_number
            ))
        })?;

    let token = AuthToken::<Student>::new(&student);
    cookies.add(token.into_cookie(config));
    Ok(())
}

/// Sign out by clearing the auth token cookie. Never fails, even when
/// already signed out.
#[delete("/auth")]
async fn logout(cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
}

#[cfg(test)]
mod tests {
    use mongodb::Database;
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::json};

    use crate::model::db::user::UserCore;
    use crate::model::mongodb::Id;

    use super::*;

    #[backend_test]
    async fn admin_login_works(client: Client, db: Database) {
        Coll::<UserCore>::from_db(&db)
            .insert_one(UserCore::example_admin(), None)
            .await
            .unwrap();

        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(rocket::http::Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn admin_login_rejects_wrong_password(client: Client, db: Database) {
        Coll::<UserCore>::from_db(&db)
            .insert_one(UserCore::example_admin(), None)
            .await
            .unwrap();

        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::example_wrong_password()).to_string())
            .dispatch()
            .await;

        assert_eq!(rocket::http::Status::Unauthorized, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());
    }

    #[backend_test]
    async fn student_login_works(client: Client, db: Database) {
        Coll::<UserCore>::from_db(&db)
            .insert_one(UserCore::example_student(), None)
            .await
            .unwrap();

        let response = client
            .post(uri!(student_login))
            .header(ContentType::JSON)
            .body(json!(StudentCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(rocket::http::Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn student_login_rejects_unknown_reference(client: Client) {
        let response = client
            .post(uri!(student_login))
            .header(ContentType::JSON)
            .body(json!(StudentCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(rocket::http::Status::Unauthorized, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());
    }

    #[backend_test]
    async fn student_cannot_login_as_admin(client: Client, db: Database) {
        Coll::<UserCore>::from_db(&db)
            .insert_one(UserCore::example_student(), None)
            .await
            .unwrap();

        // A student's reference number with any password is not an admin login.
        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(
                json!(AdminCredentials {
                    reference_number: StudentCredentials::example().reference_number,
                    password: "anything".to_string(),
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(rocket::http::Status::Unauthorized, response.status());
    }

    #[backend_test(student)]
    async fn logout_clears_the_session(client: Client) {
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let response = client.delete(uri!(logout)).dispatch().await;
        assert_eq!(rocket::http::Status::Ok, response.status());

        // The token is gone, so an authenticated route now rejects us.
        let response = client.get(uri!(crate::api::voting::my_votes)).dispatch().await;
        assert_eq!(rocket::http::Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn stale_token_for_deleted_user_is_rejected(client: Client, db: Database) {
        let users = Coll::<UserCore>::from_db(&db);
        let id: Id = users
            .insert_one(UserCore::example_student(), None)
            .await
            .unwrap()
            .inserted_id
            .as_object_id()
            .unwrap()
            .into();

        client
            .post(uri!(student_login))
            .header(ContentType::JSON)
            .body(json!(StudentCredentials::example()).to_string())
            .dispatch()
            .await;

        users.delete_one(id.as_doc(), None).await.unwrap();

        let response = client.get(uri!(crate::api::voting::my_votes)).dispatch().await;
        assert_eq!(rocket::http::Status::Unauthorized, response.status());
    }
}
