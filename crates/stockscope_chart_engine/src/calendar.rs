use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::str::FromStr;
use stockscope_shared_models::CalendarKey;

/// Time as reported by a chart widget event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Key(String),
    /// Seconds since the Unix epoch.
    Epoch(i64),
    BusinessDay { year: i32, month: u32, day: u32 },
    Other(Value),
}

impl From<&str> for RawTime {
    fn from(raw: &str) -> Self {
        RawTime::Key(raw.to_string())
    }
}

impl From<i64> for RawTime {
    fn from(secs: i64) -> Self {
        RawTime::Epoch(secs)
    }
}

/// Lenient parse for typed input: JSON when it parses, otherwise the trimmed
/// text as a key.
impl FromStr for RawTime {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(serde_json::from_str(trimmed).unwrap_or_else(|_| RawTime::Key(trimmed.to_string())))
    }
}

/// Converts any supported time representation into a calendar key.
///
/// Never fails. Strings pass through untouched, canonical or not. Epochs are
/// cut at the UTC day boundary. Business days are zero padded. Anything else
/// degrades to its JSON text, which will simply miss on lookup.
pub fn normalize(raw: &RawTime) -> CalendarKey {
    match raw {
        RawTime::Key(key) => CalendarKey::new(key.as_str()),
        RawTime::Epoch(secs) => epoch_key(*secs),
        RawTime::BusinessDay { year, month, day } => {
            CalendarKey::new(format!("{year:04}-{month:02}-{day:02}"))
        }
        RawTime::Other(value) => match value {
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(secs), _) => epoch_key(secs),
                (None, Some(secs)) if secs.is_finite() && secs.abs() < i64::MAX as f64 => {
                    epoch_key(secs.floor() as i64)
                }
                _ => CalendarKey::new(number.to_string()),
            },
            Value::String(key) => CalendarKey::new(key.as_str()),
            other => CalendarKey::new(other.to_string()),
        },
    }
}

fn epoch_key(secs: i64) -> CalendarKey {
    match DateTime::from_timestamp(secs, 0) {
        Some(at) => CalendarKey::from_date(at.date_naive()),
        None => CalendarKey::new(secs.to_string()),
    }
}
