use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core partylist data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartylistCore {
    pub name: String,
    /// Display colour, e.g. a hex code.
    pub color: String,
    /// Opaque storage references.
    pub logo: Option<String>,
    pub platform: Option<String>,
    pub group_photo: Option<String>,
}

/// A partylist without an ID.
pub type NewPartylist = PartylistCore;

/// A partylist from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partylist {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub partylist: PartylistCore,
}

impl Deref for Partylist {
    type Target = PartylistCore;

    fn deref(&self) -> &Self::Target {
        &self.partylist
    }
}

impl DerefMut for Partylist {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.partylist
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl PartylistCore {
        pub fn example_unity() -> Self {
            Self {
                name: "Unity Party".to_string(),
                color: "#1f6feb".to_string(),
                logo: None,
                platform: Some("One school, one voice.".to_string()),
                group_photo: None,
            }
        }

        pub fn example_progress() -> Self {
            Self {
                name: "Progress Alliance".to_string(),
                color: "#d29922".to_string(),
                logo: Some("logos/progress.png".to_string()),
                platform: None,
                group_photo: None,
            }
        }
    }
}
