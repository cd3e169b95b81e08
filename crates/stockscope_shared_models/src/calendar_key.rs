use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Join key shared by every series: a `YYYY-MM-DD` string.
///
/// Ordering is plain string ordering. For canonical keys that is the same as
/// chronological ordering, which window filtering relies on. Non-canonical
/// strings are still representable so a degraded crosshair time can be carried
/// through to a (failing) lookup instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarKey(String);

impl CalendarKey {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `true` when the key has the `DDDD-DD-DD` shape. Says nothing about
    /// whether the digits form a real date; see [`CalendarKey::date`].
    pub fn is_canonical(&self) -> bool {
        let bytes = self.0.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    pub fn date(&self) -> Option<NaiveDate> {
        if !self.is_canonical() {
            return None;
        }
        NaiveDate::parse_from_str(&self.0, Self::FORMAT).ok()
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for CalendarKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<&str> for CalendarKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for CalendarKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
