use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;
use crate::calendar::VotingCycle;
use crate::models::{DateKey, MonthLabel};
use crate::tally::AggregateTally;

/// Copy of the vote set taken right before a toggle. Handing it back to the
/// store undoes that toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSnapshot {
    votes: BTreeSet<DateKey>,
    toggled: DateKey,
}

impl VoteSnapshot {
    pub fn votes(&self) -> &BTreeSet<DateKey> {
        &self.votes
    }

    pub fn toggled(&self) -> &DateKey {
        &self.toggled
    }

    /// Whether the toggled date was voted before the toggle.
    pub fn was_voted(&self) -> bool {
        self.votes.contains(&self.toggled)
    }
}

/// One row of the voting view.
#[derive(Debug, Clone, PartialEq)]
pub struct DateView {
    pub key: DateKey,
    pub count: u32,
    pub percentage: f64,
    pub is_voted_by_me: bool,
    pub pending: bool,
}

/// The session user's votes plus the last fetched tallies.
///
/// `my_votes` is updated before the server confirms; it is the only thing the
/// view consults for a date's toggle state.
#[derive(Debug, Default)]
pub struct OptimisticVoteStore {
    my_votes: BTreeSet<DateKey>,
    tallies: HashMap<MonthLabel, AggregateTally>,
    generation: u64,
}

impl OptimisticVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, key: &str) -> bool {
        self.my_votes.contains(key)
    }

    pub fn my_votes(&self) -> &BTreeSet<DateKey> {
        &self.my_votes
    }

    pub fn begin_toggle(&mut self, key: &DateKey) -> VoteSnapshot {
        let snapshot = VoteSnapshot { votes: self.my_votes.clone(), toggled: key.clone() };
        if !self.my_votes.remove(key) {
            self.my_votes.insert(key.clone());
        }
        snapshot
    }

    pub fn rollback(&mut self, snapshot: VoteSnapshot) {
        self.my_votes = snapshot.votes;
    }

    /// Puts only the snapshot's toggled date back the way it was, leaving
    /// later toggles of other dates alone.
    pub fn revert(&mut self, snapshot: &VoteSnapshot) {
        if snapshot.was_voted() {
            self.my_votes.insert(snapshot.toggled.clone());
        } else {
            self.my_votes.remove(&snapshot.toggled);
        }
    }

    pub fn replace_tally(&mut self, month: MonthLabel, tally: AggregateTally) {
        debug!(%month, total = tally.total(), "tally replaced");
        self.tallies.insert(month, tally);
    }

    pub fn replace_my_votes(&mut self, votes: impl IntoIterator<Item = DateKey>) {
        self.my_votes = votes.into_iter().collect();
    }

    pub fn tally(&self, month: MonthLabel) -> Option<&AggregateTally> {
        self.tallies.get(&month)
    }

    /// Bumped by [`clear`](Self::clear); lets late responses detect that the
    /// session they belonged to is gone.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.my_votes.clear();
        self.tallies.clear();
        self.generation += 1;
    }

    pub fn month_view(&self, cycle: &VotingCycle, month: MonthLabel, pending: &HashSet<DateKey>) -> Vec<DateView> {
        let empty = AggregateTally::new();
        let tally = self.tally(month).unwrap_or(&empty);

        cycle.candidates(month)
            .into_iter()
            .map(|date| {
                let key = date.key();
                DateView {
                    count: tally.count(key.as_str()),
                    percentage: tally.percentage_of(key.as_str()),
                    is_voted_by_me: self.has_voted(key.as_str()),
                    pending: pending.contains(&key),
                    key,
                }
            })
            .collect()
    }
}
