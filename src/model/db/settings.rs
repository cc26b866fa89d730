use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{common::ElectionStatus, mongodb::Coll};

/// Singleton school-wide configuration.
///
/// Exactly one document lives in the `settings` collection; it is seeded at
/// startup and replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSettings {
    pub school_name: String,
    pub election_title: String,
    pub status: ElectionStatus,
    /// Optional voting window; an unset bound is unbounded.
    pub voting_start: Option<DateTime<Utc>>,
    pub voting_end: Option<DateTime<Utc>>,
    /// Opaque storage references.
    pub logo: Option<String>,
    pub cover_photo: Option<String>,
}

impl SchoolSettings {
    /// Is voting allowed at the given instant?
    pub fn voting_open(&self, now: DateTime<Utc>) -> bool {
        if self.status != ElectionStatus::Open {
            return false;
        }
        if let Some(start) = self.voting_start {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.voting_end {
            if now > end {
                return false;
            }
        }
        true
    }
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            school_name: "Unnamed School".to_string(),
            election_title: "School Election".to_string(),
            status: ElectionStatus::Pending,
            voting_start: None,
            voting_end: None,
            logo: None,
            cover_photo: None,
        }
    }
}

/// Fetch the settings singleton.
pub async fn school_settings(settings: &Coll<SchoolSettings>) -> Result<SchoolSettings> {
    settings
        .find_one(None, None)
        .await?
        .ok_or_else(|| Error::not_found("School settings"))
}

/// Ensure the settings singleton exists, seeding the default if necessary.
///
/// This operation is idempotent.
pub async fn ensure_settings_exist(
    settings: &Coll<SchoolSettings>,
) -> mongodb::error::Result<()> {
    if settings.find_one(None, None).await?.is_none() {
        info!("No school settings found, seeding defaults");
        settings.insert_one(SchoolSettings::default(), None).await?;
    }
    Ok(())
}
