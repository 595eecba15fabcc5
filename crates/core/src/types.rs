use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Store-assigned record identifier.
///
/// Opaque to the client: the store may hand back an integer key or a UUID
/// string, and both are carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

/// Deserialize a store timestamp.
///
/// `timestamptz` columns arrive as RFC 3339 with an offset; plain
/// `timestamp` columns arrive without one and are taken as UTC.
pub fn store_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&chrono::Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// Deserialize a nullable string column, mapping `null` to an empty string.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_integer_keys() {
        let id: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn record_id_accepts_uuid_strings() {
        let id: RecordId =
            serde_json::from_str("\"0b7e6d7c-9d1b-4a6e-8f0a-3f1c2a9b7e11\"").unwrap();
        assert_eq!(id.to_string(), "0b7e6d7c-9d1b-4a6e-8f0a-3f1c2a9b7e11");
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "store_timestamp")]
        at: Timestamp,
    }

    fn parse_at(raw: &str) -> Result<Timestamp, serde_json::Error> {
        serde_json::from_value::<Row>(serde_json::json!({ "at": raw })).map(|r| r.at)
    }

    #[test]
    fn store_timestamp_accepts_offset_and_naive_forms() {
        let expected = chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2025, 4, 1, 0, 30, 0).unwrap();
        assert_eq!(parse_at("2025-04-01T09:30:00+09:00").unwrap(), expected);
        assert_eq!(parse_at("2025-04-01T00:30:00.000000").unwrap(), expected);
        assert_eq!(parse_at("2025-04-01 00:30:00").unwrap(), expected);
        assert!(parse_at("yesterday").is_err());
    }

    #[test]
    fn record_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RecordId::new("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
