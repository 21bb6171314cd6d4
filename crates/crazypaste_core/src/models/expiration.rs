//! Expiration selectors offered at creation time and their resolution to
//! absolute timestamps.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of expiration choices a paste can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExpirationSelector {
    #[default]
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "10m")]
    TenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    /// Read-triggered deletion; carries no absolute expiry.
    #[serde(rename = "burn")]
    Burn,
}

impl ExpirationSelector {
    /// Every selector, in the order a form would offer them.
    pub const ALL: [ExpirationSelector; 7] = [
        Self::Never,
        Self::TenMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::Burn,
    ];

    /// Parse a selector string. Unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "never" => Some(Self::Never),
            "10m" => Some(Self::TenMinutes),
            "1h" => Some(Self::OneHour),
            "1d" => Some(Self::OneDay),
            "1w" => Some(Self::OneWeek),
            "1m" => Some(Self::OneMonth),
            "burn" => Some(Self::Burn),
            _ => None,
        }
    }

    /// Wire/string form of the selector.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::TenMinutes => "10m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::Burn => "burn",
        }
    }

    /// Resolve to an absolute expiry in milliseconds since the epoch.
    ///
    /// `never` and `burn` resolve to `None`. `1m` is one calendar month, so
    /// Jan 31 resolves to the last day of February.
    pub fn resolve(self, now: DateTime<Utc>) -> Option<i64> {
        let expires = match self {
            Self::Never | Self::Burn => return None,
            Self::TenMinutes => now + Duration::minutes(10),
            Self::OneHour => now + Duration::hours(1),
            Self::OneDay => now + Duration::days(1),
            Self::OneWeek => now + Duration::weeks(1),
            Self::OneMonth => now
                .checked_add_months(Months::new(1))
                .unwrap_or_else(|| now + Duration::days(30)),
        };
        Some(expires.timestamp_millis())
    }

    /// Whether this selector turns on burn-after-reading.
    pub const fn is_burn(self) -> bool {
        matches!(self, Self::Burn)
    }
}

impl fmt::Display for ExpirationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a selector string relative to an explicit `now`.
///
/// Unrecognized selectors resolve to `None`, the same as `never`.
pub fn expiration_timestamp_at(selector: &str, now: DateTime<Utc>) -> Option<i64> {
    ExpirationSelector::parse(selector).and_then(|parsed| parsed.resolve(now))
}

/// Resolve a selector string relative to the current wall-clock time.
pub fn get_expiration_timestamp(selector: &str) -> Option<i64> {
    expiration_timestamp_at(selector, Utc::now())
}

/// Whether a paste with `expires` is gone at `now_millis`.
pub fn is_expired(expires: Option<i64>, now_millis: i64) -> bool {
    expires.is_some_and(|at| now_millis >= at)
}
