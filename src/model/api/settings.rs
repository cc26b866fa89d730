use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{common::ElectionStatus, db::settings::SchoolSettings};

/// An admin-supplied settings replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSpec {
    pub school_name: String,
    pub election_title: String,
    pub status: ElectionStatus,
    #[serde(default)]
    pub voting_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voting_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub cover_photo: Option<String>,
}

impl From<SettingsSpec> for SchoolSettings {
    fn from(spec: SettingsSpec) -> Self {
        Self {
            school_name: spec.school_name,
            election_title: spec.election_title,
            status: spec.status,
            voting_start: spec.voting_start,
            voting_end: spec.voting_end,
            logo: spec.logo,
            cover_photo: spec.cover_photo,
        }
    }
}

/// The public view of the settings: enough for a sign-in page, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSummary {
    pub school_name: String,
    pub election_title: String,
    pub status: ElectionStatus,
    pub logo: Option<String>,
}

impl From<SchoolSettings> for SettingsSummary {
    fn from(settings: SchoolSettings) -> Self {
        Self {
            school_name: settings.school_name,
            election_title: settings.election_title,
            status: settings.status,
            logo: settings.logo,
        }
    }
}
