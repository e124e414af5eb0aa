use crate::error::VouchError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph repeated once per rating point when a vouch is displayed.
pub const STAR: &str = "⭐";

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }

    /// The rating rendered as that many star glyphs.
    pub fn stars(self) -> String {
        STAR.repeat(self.0 as usize)
    }
}

impl TryFrom<i64> for Rating {
    type Error = VouchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(VouchError::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// VouchRecord
// ---------------------------------------------------------------------------

/// Identity of a submitter, captured once when the vouch is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display tag at submission time; never re-resolved.
    pub name: String,
    pub id: String,
    pub avatar: String,
}

/// One persisted review, as stored in `information.json`.
///
/// `id` is a display label: it is derived from the store length at creation
/// time, so gaps or duplicates in a hand-edited file are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VouchRecord {
    pub id: u64,
    pub author: String,
    pub author_id: String,
    pub avatar: String,
    pub rating: Rating,
    pub review: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attachment: Option<String>,
}

impl VouchRecord {
    /// Build a record. The timestamp is truncated to millisecond precision,
    /// matching what is written to disk.
    pub fn new(
        id: u64,
        author: Author,
        rating: Rating,
        review: impl Into<String>,
        attachment: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        VouchRecord {
            id,
            author: author.name,
            author_id: author.id,
            avatar: author.avatar,
            rating,
            review: review.into(),
            timestamp: timestamp.trunc_subsecs(3),
            attachment,
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix,
/// e.g. `2024-05-01T12:30:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
