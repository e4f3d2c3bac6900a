use std::fmt;
use time::{Date, Month, Weekday};
use crate::models::{DateKey, MonthLabel};

const SHORT_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One date users can vote for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateDate(Date);

impl CandidateDate {
    pub fn date(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    pub fn key(&self) -> DateKey {
        DateKey::new(self.to_string())
    }
}

// Same shape the server stores: "Fri Oct 03 2025".
impl fmt::Display for CandidateDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weekday = SHORT_WEEKDAYS[usize::from(self.0.weekday().number_days_from_monday())];
        let month = SHORT_MONTHS[usize::from(u8::from(self.0.month()) - 1)];
        write!(f, "{} {} {:02} {:04}", weekday, month, self.0.day(), self.0.year())
    }
}

/// Every Friday of `month` in `year`, ascending.
pub fn fridays_in_month(year: i32, month: Month) -> Vec<CandidateDate> {
    let Ok(first) = Date::from_calendar_date(year, month, 1) else {
        return Vec::new();
    };
    let offset = (7 + Weekday::Friday.number_days_from_monday()
        - first.weekday().number_days_from_monday()) % 7;
    let last_day = month.length(year);

    (1 + offset..=last_day)
        .step_by(7)
        .filter_map(|day| Date::from_calendar_date(year, month, day).ok())
        .map(CandidateDate)
        .collect()
}

/// Like [`fridays_in_month`] with a zero-based month index. Out-of-range
/// indices have no Fridays.
pub fn fridays_in_month_index(year: i32, month_index: u8) -> Vec<CandidateDate> {
    month_index.checked_add(1)
        .and_then(|m| Month::try_from(m).ok())
        .map(|month| fridays_in_month(year, month))
        .unwrap_or_default()
}

/// The months tracked for one gathering year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingCycle {
    pub year: i32,
    pub months: Vec<MonthLabel>,
}

impl VotingCycle {
    pub const DEFAULT_MONTHS: [MonthLabel; 4] = [
        MonthLabel::SEPTEMBER,
        MonthLabel::OCTOBER,
        MonthLabel::NOVEMBER,
        MonthLabel::DECEMBER,
    ];

    pub fn new(year: i32, months: Vec<MonthLabel>) -> Self {
        Self { year, months }
    }

    pub fn for_year(year: i32) -> Self {
        Self::new(year, Self::DEFAULT_MONTHS.to_vec())
    }

    pub fn tracks(&self, month: MonthLabel) -> bool {
        self.months.contains(&month)
    }

    pub fn candidates(&self, month: MonthLabel) -> Vec<CandidateDate> {
        fridays_in_month(self.year, month.month())
    }
}
