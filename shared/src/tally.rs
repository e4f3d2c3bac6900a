use std::collections::HashMap;
use crate::models::{DateKey, MonthLabel, VoteRecord};

/// Vote counts per date for one month, as of the last fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTally {
    counts: HashMap<DateKey, u32>,
}

impl AggregateTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every record regardless of its month. Use for the response of a
    /// single-month fetch.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a VoteRecord>) -> Self {
        let mut tally = Self::new();
        records.into_iter().for_each(|r| tally.record(r.event_date.clone()));
        tally
    }

    pub fn record(&mut self, key: DateKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn counts(&self) -> &HashMap<DateKey, u32> {
        &self.counts
    }

    /// Share of this month's votes cast for `key`, in `[0, 100]`. Zero when
    /// nobody has voted yet.
    pub fn percentage_of(&self, key: &str) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.count(key)) / f64::from(total) * 100.0,
        }
    }
}

/// Repeated keys add up.
impl FromIterator<(DateKey, u32)> for AggregateTally {
    fn from_iter<I: IntoIterator<Item = (DateKey, u32)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (key, n) in iter.into_iter().filter(|(_, n)| *n > 0) {
            *tally.counts.entry(key).or_insert(0) += n;
        }
        tally
    }
}

/// Groups records by month, then counts them per date.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a VoteRecord>) -> HashMap<MonthLabel, AggregateTally> {
    records.into_iter().fold(HashMap::new(), |mut acc, r| {
        acc.entry(r.month).or_insert_with(AggregateTally::new).record(r.event_date.clone());
        acc
    })
}

/// Two decimals, e.g. `66.67`. A month nobody voted in reads `0`.
pub fn format_percentage(percentage: f64, month_total: u32) -> String {
    match month_total {
        0 => "0".to_string(),
        _ => format!("{:.2}", percentage),
    }
}
