use anyhow::bail;
use derive_more::{Display, Into};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opening hours keyed by day label, in the order the page lists them.
pub type Hours = IndexMap<String, String>;

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct LoungeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub hours: Hours,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    /// Only ever `Some(true)`; a card without a booking marker leaves it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_booking_available: Option<bool>,
}

impl LoungeRecord {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Amenity {
    pub name: String,
    pub available: bool,
}

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Display, Into, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rating(u32);
impl TryFrom<u32> for Rating {
    type Error = anyhow::Error;
    fn try_from(v: u32) -> anyhow::Result<Self> {
        if v > Self::MAX {
            bail!("Rating out of range: {v}");
        }
        Ok(Self(v))
    }
}
impl Rating {
    pub const MAX: u32 = 5;

    pub fn get(self) -> u32 {
        self.0
    }
}
