use serde::{Serialize, Deserialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use time::Month;

/// Display key of a candidate date, e.g. `"Fri Oct 10 2025"`.
///
/// The server stores votes under this exact string, so it is also the key of
/// every local map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DateKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for DateKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown month: {0}")]
pub struct UnknownMonth(pub String);

/// A named month tracked by a voting cycle. Travels on the wire as its English
/// name (`"October"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthLabel(Month);

impl MonthLabel {
    pub const SEPTEMBER: MonthLabel = MonthLabel(Month::September);
    pub const OCTOBER: MonthLabel = MonthLabel(Month::October);
    pub const NOVEMBER: MonthLabel = MonthLabel(Month::November);
    pub const DECEMBER: MonthLabel = MonthLabel(Month::December);

    pub const fn new(month: Month) -> Self {
        Self(month)
    }

    pub const fn month(self) -> Month {
        self.0
    }

    /// Zero-based index, January = 0.
    pub fn index(self) -> u8 {
        u8::from(self.0) - 1
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.index())]
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonthLabel {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MONTH_NAMES.iter()
            .position(|name| name.eq_ignore_ascii_case(s.trim()))
            .and_then(|i| Month::try_from(i as u8 + 1).ok())
            .map(MonthLabel)
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

impl TryFrom<String> for MonthLabel {
    type Error = UnknownMonth;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthLabel> for String {
    fn from(label: MonthLabel) -> Self {
        label.name().to_string()
    }
}

/// A vote as reported by the server. Created when a user casts a vote and
/// deleted when they retract it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub event_date: DateKey,
    pub month: MonthLabel,
}

/// Body of `POST /votes`. The server toggles the caller's vote for the date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastVoteRequest {
    pub event_date: DateKey,
    pub month: MonthLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Claims the client reads from the access token payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenClaims {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.exp.map_or(false, |exp| exp <= now_unix)
    }
}
