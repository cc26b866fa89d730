use rocket::{serde::json::Json, Route};

use crate::error::Result;
use crate::model::{
    api::settings::SettingsSummary,
    db::settings::{school_settings, SchoolSettings},
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![settings_summary]
}

/// The public settings view, available without signing in so the sign-in
/// page can brand itself and show whether voting is open.
#[get("/settings/summary")]
pub async fn settings_summary(settings: Coll<SchoolSettings>) -> Result<Json<SettingsSummary>> {
    let settings = school_settings(&settings).await?;
    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use rocket::local::asynchronous::Client;

    use crate::model::common::ElectionStatus;

    use super::*;

    #[backend_test]
    async fn summary_needs_no_authentication(client: Client) {
        let response = client.get(uri!(settings_summary)).dispatch().await;
        assert_eq!(rocket::http::Status::Ok, response.status());

        let summary: SettingsSummary = response.into_json().await.unwrap();
        // The seeded defaults.
        assert_eq!("Unnamed School", summary.school_name);
        assert_eq!(ElectionStatus::Pending, summary.status);
    }
}
