//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::{Assignment, Error, HelpRequest, HelpRequestId, TownSummary, UserId};

/// Driving port for help request, assignment and town summary reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpRequestQuery: Send + Sync {
    /// Fetch exactly one request or fail with `not_found`.
    async fn get_one(&self, id: HelpRequestId) -> Result<HelpRequest, Error>;

    /// Needs the user created or is assigned to. `None` yields an empty list
    /// without touching the store.
    async fn requests_by_user(&self, user_id: Option<UserId>) -> Result<Vec<HelpRequest>, Error>;

    /// Offers the user created. `None` yields an empty list.
    async fn offers_by_user(&self, user_id: Option<UserId>) -> Result<Vec<HelpRequest>, Error>;

    /// Every assignment recorded against a request.
    async fn assignments(&self, help_request_id: HelpRequestId) -> Result<Vec<Assignment>, Error>;

    /// Towns with offers, needs or unassigned needs in the last 24 hours.
    async fn todays_count_by_town(&self) -> Result<Vec<TownSummary>, Error>;
}
