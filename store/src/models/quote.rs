use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    pub message: String,
    #[serde(with = "timestamp")]
    pub time: NaiveDateTime,
}

/// Quote timestamps are stored as ISO-8601 strings with second precision and no offset.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        // Older records may carry fractional seconds.
        raw.parse::<NaiveDateTime>()
            .map_err(|e| D::Error::custom(format!("invalid timestamp `{}`: {}", raw, e)))
    }
}
