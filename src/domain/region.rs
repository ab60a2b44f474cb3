//! Type-safe region codes.
//!
//! [`Region`] is the fixed set of event-serving zones exposed by the upstream
//! game-events API. The same set is the relay's allow-list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Geographic event-serving zone of the upstream API.
///
/// Serialized as its short upper-case code (e.g. `"SG"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Singapore.
    Sg,
    /// Bangladesh.
    Bd,
    /// India.
    Ind,
    /// CIS.
    Cis,
    /// Europe.
    Eu,
    /// North America.
    Na,
    /// Pakistan.
    Pk,
    /// Indonesia.
    Id,
    /// Thailand.
    Th,
    /// Middle East.
    Me,
    /// Brazil.
    Br,
    /// South America.
    Sac,
    /// Vietnam.
    Vn,
}

impl utoipa::PartialSchema for Region {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .examples([serde_json::json!("SG")])
            .into()
    }
}

impl ToSchema for Region {}

impl Region {
    /// Every supported region, in catalog order.
    pub const ALL: [Self; 13] = [
        Self::Sg,
        Self::Bd,
        Self::Ind,
        Self::Cis,
        Self::Eu,
        Self::Na,
        Self::Pk,
        Self::Id,
        Self::Th,
        Self::Me,
        Self::Br,
        Self::Sac,
        Self::Vn,
    ];

    /// Short code sent to the upstream API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sg => "SG",
            Self::Bd => "BD",
            Self::Ind => "IND",
            Self::Cis => "CIS",
            Self::Eu => "EU",
            Self::Na => "NA",
            Self::Pk => "PK",
            Self::Id => "ID",
            Self::Th => "TH",
            Self::Me => "ME",
            Self::Br => "BR",
            Self::Sac => "SAC",
            Self::Vn => "VN",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sg => "Singapore",
            Self::Bd => "Bangladesh",
            Self::Ind => "India",
            Self::Cis => "CIS",
            Self::Eu => "Europe",
            Self::Na => "North America",
            Self::Pk => "Pakistan",
            Self::Id => "Indonesia",
            Self::Th => "Thailand",
            Self::Me => "Middle East",
            Self::Br => "Brazil",
            Self::Sac => "South America",
            Self::Vn => "Vietnam",
        }
    }
}

impl FromStr for Region {
    type Err = GatewayError;

    /// Parses a region code, ignoring surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or(GatewayError::InvalidRegion(code))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
