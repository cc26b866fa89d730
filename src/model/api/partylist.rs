use serde::{Deserialize, Serialize};

use crate::model::{
    db::partylist::{Partylist, PartylistCore},
    mongodb::Id,
};

/// An admin-supplied partylist to create or replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartylistSpec {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub group_photo: Option<String>,
}

impl From<PartylistSpec> for PartylistCore {
    fn from(spec: PartylistSpec) -> Self {
        Self {
            name: spec.name,
            color: spec.color,
            logo: spec.logo,
            platform: spec.platform,
            group_photo: spec.group_photo,
        }
    }
}

/// A partylist as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartylistDescription {
    pub id: Id,
    pub name: String,
    pub color: String,
    pub logo: Option<String>,
    pub platform: Option<String>,
    pub group_photo: Option<String>,
}

impl From<Partylist> for PartylistDescription {
    fn from(partylist: Partylist) -> Self {
        Self {
            id: partylist.id,
            name: partylist.partylist.name,
            color: partylist.partylist.color,
            logo: partylist.partylist.logo,
            platform: partylist.partylist.platform,
            group_photo: partylist.partylist.group_photo,
        }
    }
}
