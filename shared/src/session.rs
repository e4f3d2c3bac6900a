use async_trait::async_trait;
use crate::error::Result;
use crate::models::{DateKey, MonthLabel, VoteRecord};

/// Holder of the auth token. The sync engine only reads the token; clearing it
/// is left to the session.
pub trait Session {
    fn current_token(&self) -> Option<String>;

    /// Called when the API rejects the token. Implementations clear the stored
    /// credentials and send the user back to login.
    fn on_authentication_failure(&self);
}

/// The vote endpoints the engine talks to.
#[async_trait(?Send)]
pub trait VoteApi {
    /// `GET /votes/{month}`
    async fn fetch_month(&self, token: &str, month: MonthLabel) -> Result<Vec<VoteRecord>>;

    /// `GET /votes/my-votes`
    async fn fetch_my_votes(&self, token: &str) -> Result<Vec<VoteRecord>>;

    /// `POST /votes`; casts the vote if absent, retracts it otherwise.
    async fn toggle_vote(&self, token: &str, event_date: &DateKey, month: MonthLabel) -> Result<()>;
}
