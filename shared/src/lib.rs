pub mod error;
pub mod models;
pub mod calendar;
pub mod tally;
pub mod store;
pub mod session;
pub mod config;
pub mod sync;

pub use error::{ApiError, ErrorResponse, Result};
pub use models::*;
pub use calendar::{fridays_in_month, fridays_in_month_index, CandidateDate, VotingCycle};
pub use tally::{aggregate, format_percentage, AggregateTally};
pub use store::{DateView, OptimisticVoteStore, VoteSnapshot};
pub use session::{Session, VoteApi};
pub use config::SyncConfig;
pub use sync::{PendingToggle, RequestId, ToggleOutcome, ToggleRejected, ToggleState, VoteSyncController};
