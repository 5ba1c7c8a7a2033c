use crate::models::quote::Quote;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer};

/// How far back quotes are returned.
///
/// Parsing never fails: any value other than `year`, `month` or `week`
/// (matched exactly, case-sensitive) selects [`MaxAge::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxAge {
    #[default]
    All,
    Year,
    Month,
    Week,
}

impl MaxAge {
    pub fn window(&self) -> Option<TimeDelta> {
        match self {
            MaxAge::All => None,
            MaxAge::Year => Some(TimeDelta::days(365)),
            // four weeks, not a calendar month
            MaxAge::Month => Some(TimeDelta::weeks(4)),
            MaxAge::Week => Some(TimeDelta::weeks(1)),
        }
    }

    /// Quotes must be strictly newer than this to be kept.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.window().and_then(|window| now.checked_sub_signed(window))
    }
}

impl From<&str> for MaxAge {
    fn from(value: &str) -> Self {
        match value {
            "year" => MaxAge::Year,
            "month" => MaxAge::Month,
            "week" => MaxAge::Week,
            _ => MaxAge::All,
        }
    }
}

impl<'de> Deserialize<'de> for MaxAge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MaxAge::from(raw.as_str()))
    }
}

/// Returns the quotes newer than `max_age` relative to `now`, in their original order.
pub fn filter_by_age(quotes: &[Quote], max_age: MaxAge, now: NaiveDateTime) -> Vec<&Quote> {
    match max_age.cutoff(now) {
        Some(cutoff) => quotes.iter().filter(|quote| quote.time > cutoff).collect(),
        None => quotes.iter().collect(),
    }
}
