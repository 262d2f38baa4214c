use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A pending human classification task.
///
/// Each identification binds one [`Snapshot`] to one object type (by slug).
/// The same snapshot usually appears in several consecutive identifications,
/// one per object type monitored on its camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identification {
    pub id: Uuid,
    /// Slug of the object type being judged.
    pub object: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    pub snapshot: Snapshot,
    /// Server-side review status; changes as a side effect of submitting.
    #[serde(default)]
    pub status: Option<String>,
    /// Label proposed by the AI model.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Identification {
    pub fn image_url(&self) -> &str {
        &self.snapshot.image_url
    }
}

/// Camera frame an identification refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub image_url: String,
    #[serde(default)]
    pub camera_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body of `POST /identifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub identification_id: Uuid,
    pub label: String,
}

/// Parse an API timestamp.
///
/// The API stores naive datetimes, so a value without an offset is read as
/// UTC. RFC 3339 values with an offset are converted to UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(aware.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}
