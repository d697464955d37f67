use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{deserialize_nullable_string, deserialize_nullable_vec};

/// Opaque locator for an image's source content.
///
/// No uniqueness is implied: the same reference may appear several times in
/// one entry and each occurrence is a separate item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Optional descriptive metadata attached to a day-entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    #[serde(default)]
    pub title: Option<String>,
    /// When the thread is scheduled to go out. Unparseable values are dropped.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// The images and trailing caption scheduled for one calendar day.
///
/// Immutable once fetched: a later fetch replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    /// Ordered image references; order is significant.
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub images: Vec<ImageRef>,
    /// Caption posted after the images.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub trailing_text: String,
    #[serde(default, deserialize_with = "deserialize_nullable_meta")]
    pub meta: EntryMeta,
}

impl DayEntry {
    pub fn new(images: Vec<ImageRef>, trailing_text: impl Into<String>) -> Self {
        Self {
            images,
            trailing_text: trailing_text.into(),
            meta: EntryMeta::default(),
        }
    }

    /// Parse an entry service response body.
    ///
    /// The entry may be the top-level object or nested under an `entry` key.
    pub fn from_response_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut value: serde_json::Value = serde_json::from_slice(body)?;
        let payload = match value.as_object_mut().and_then(|obj| obj.remove("entry")) {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        serde_json::from_value(payload)
    }
}

fn deserialize_nullable_meta<'de, D>(deserializer: D) -> Result<EntryMeta, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<EntryMeta>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

fn deserialize_lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(s.trim()),
        _ => None,
    })
}

/// ISO-8601 with an offset, without one, or a bare date. Missing offsets
/// are read as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
