use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use futures::future::join_all;
use futures::join;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::config::SyncConfig;
use crate::error::ApiError;
use crate::models::{DateKey, MonthLabel};
use crate::session::{Session, VoteApi};
use crate::store::{DateView, OptimisticVoteStore, VoteSnapshot};
use crate::tally::AggregateTally;

/// Correlates one toggle request across log lines and settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle,
    Optimistic { request: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server accepted the toggle; the optimistic value stands.
    Confirmed,
    /// Request failed and the date was put back as it was.
    RolledBack(ApiError),
    /// The session ended while the request was in flight; nothing was applied.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleRejected {
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("A vote for {0} is already being sent")]
    InFlight(DateKey),
}

/// A toggle that has been applied locally and still awaits the server.
#[derive(Debug)]
pub struct PendingToggle {
    request: RequestId,
    key: DateKey,
    month: MonthLabel,
    token: String,
    snapshot: VoteSnapshot,
    generation: u64,
}

impl PendingToggle {
    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn key(&self) -> &DateKey {
        &self.key
    }

    pub fn month(&self) -> MonthLabel {
        self.month
    }
}

/// Drives the store through `Idle -> Optimistic -> {Confirmed | RolledBack}`
/// for each date and keeps the tallies fresh.
///
/// Everything runs on one thread: the store is only borrowed between awaits,
/// never across one.
pub struct VoteSyncController<A, S> {
    api: A,
    session: S,
    store: Rc<RefCell<OptimisticVoteStore>>,
    config: SyncConfig,
    in_flight: RefCell<HashMap<DateKey, RequestId>>,
}

impl<A: VoteApi, S: Session> VoteSyncController<A, S> {
    pub fn new(api: A, session: S, store: Rc<RefCell<OptimisticVoteStore>>, config: SyncConfig) -> Self {
        Self {
            api,
            session,
            store,
            config,
            in_flight: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &Rc<RefCell<OptimisticVoteStore>> {
        &self.store
    }

    pub fn state_of(&self, key: &str) -> ToggleState {
        self.in_flight.borrow()
            .get(key)
            .map_or(ToggleState::Idle, |&request| ToggleState::Optimistic { request })
    }

    pub fn pending_dates(&self) -> HashSet<DateKey> {
        self.in_flight.borrow().keys().cloned().collect()
    }

    pub fn month_view(&self, month: MonthLabel) -> Vec<DateView> {
        let pending = self.pending_dates();
        self.store.borrow().month_view(&self.config.cycle, month, &pending)
    }

    /// Fetches every tracked month and the user's own votes, then fills the
    /// store in one go.
    pub async fn load(&self) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let generation = self.store.borrow().generation();
        let months = self.config.cycle.months.clone();

        let (tallies, mine) = join!(
            join_all(months.iter().map(|&month| self.api.fetch_month(&token, month))),
            self.api.fetch_my_votes(&token)
        );

        if self.store.borrow().generation() != generation {
            info!("session ended during initial load, discarding results");
            return Ok(());
        }

        let mut first_error = None;
        {
            let mut store = self.store.borrow_mut();
            for (month, result) in months.iter().zip(tallies) {
                match result {
                    Ok(records) => store.replace_tally(*month, AggregateTally::from_records(&records)),
                    Err(e) => {
                        error!(%month, error = %e, "failed to fetch votes");
                        first_error.get_or_insert(e);
                    }
                }
            }
            match mine {
                Ok(records) => store.replace_my_votes(records.into_iter().map(|r| r.event_date)),
                Err(e) => {
                    error!(error = %e, "failed to fetch the user's votes");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => {
                info!(months = months.len(), "votes loaded");
                Ok(())
            }
            Some(e) => {
                if e.is_auth_expired() {
                    self.session.on_authentication_failure();
                }
                Err(e)
            }
        }
    }

    /// Re-fetches one month's tally.
    pub async fn refresh(&self, month: MonthLabel) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let generation = self.store.borrow().generation();
        let result = self.fetch_tally(&token, month, generation).await;
        if let Err(e) = &result {
            if e.is_auth_expired() {
                self.session.on_authentication_failure();
            }
        }
        result
    }

    /// Applies the toggle locally right away. Pass the result to
    /// [`settle`](Self::settle) to talk to the server.
    pub fn begin(&self, key: DateKey, month: MonthLabel) -> Result<PendingToggle, ToggleRejected> {
        let Some(token) = self.session.current_token() else {
            warn!(%key, "vote attempted without a session");
            self.session.on_authentication_failure();
            return Err(ToggleRejected::NotAuthenticated);
        };

        if self.config.serialize_same_date && self.in_flight.borrow().contains_key(&key) {
            debug!(%key, "toggle dropped, previous one still in flight");
            return Err(ToggleRejected::InFlight(key));
        }
        if !self.config.cycle.tracks(month) {
            warn!(%key, %month, "toggle for a month outside the current cycle");
        }

        let request = RequestId::new();
        let (snapshot, generation) = {
            let mut store = self.store.borrow_mut();
            (store.begin_toggle(&key), store.generation())
        };
        if let Some(previous) = self.in_flight.borrow_mut().insert(key.clone(), request) {
            warn!(%key, %previous, %request, "overlapping toggles for the same date, last response wins");
        }
        info!(%request, %key, %month, voted = !snapshot.was_voted(), "optimistic toggle");

        Ok(PendingToggle { request, key, month, token, snapshot, generation })
    }

    /// Sends the toggle and reconciles the store with the answer.
    pub async fn settle(&self, pending: PendingToggle) -> ToggleOutcome {
        let result = self.api.toggle_vote(&pending.token, &pending.key, pending.month).await;
        self.finish(&pending);

        let current = self.store.borrow().generation();
        if current != pending.generation {
            info!(request = %pending.request, "session ended before the toggle settled, discarding");
            return ToggleOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                info!(request = %pending.request, key = %pending.key, "toggle confirmed");
                if let Err(e) = self.fetch_tally(&pending.token, pending.month, pending.generation).await {
                    warn!(month = %pending.month, error = %e, "tally refresh after toggle failed");
                    if e.is_auth_expired() {
                        self.session.on_authentication_failure();
                    }
                }
                ToggleOutcome::Confirmed
            }
            Err(e) => {
                self.store.borrow_mut().revert(&pending.snapshot);
                if e.is_auth_expired() {
                    warn!(request = %pending.request, key = %pending.key, "session expired, vote rolled back");
                    self.session.on_authentication_failure();
                } else {
                    warn!(request = %pending.request, key = %pending.key, error = %e, "vote rolled back");
                }
                ToggleOutcome::RolledBack(e)
            }
        }
    }

    pub async fn toggle(&self, key: DateKey, month: MonthLabel) -> Result<ToggleOutcome, ToggleRejected> {
        let pending = self.begin(key, month)?;
        Ok(self.settle(pending).await)
    }

    /// Drops all vote state, e.g. on logout. Requests still in flight will be
    /// discarded when they settle.
    pub fn reset(&self) {
        self.store.borrow_mut().clear();
        self.in_flight.borrow_mut().clear();
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.session.current_token().ok_or_else(|| {
            self.session.on_authentication_failure();
            ApiError::Unauthorized
        })
    }

    fn finish(&self, pending: &PendingToggle) {
        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight.get(&pending.key) == Some(&pending.request) {
            in_flight.remove(&pending.key);
        }
    }

    async fn fetch_tally(&self, token: &str, month: MonthLabel, generation: u64) -> Result<(), ApiError> {
        let records = self.api.fetch_month(token, month).await?;
        let mut store = self.store.borrow_mut();
        if store.generation() == generation {
            store.replace_tally(month, AggregateTally::from_records(&records));
        }
        Ok(())
    }
}
