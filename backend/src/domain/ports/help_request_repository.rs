//! Port for help request persistence and the per-town summary view.

use async_trait::async_trait;

use crate::domain::{
    HelpRequest, HelpRequestChanges, HelpRequestId, HelpRequestKind, NewHelpRequest, TownSummary,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by help request repository adapters.
    pub enum HelpRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "help request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "help request repository query failed: {message}",
        /// No row matched the identifier.
        NotFound { id: i64 } => "help request {id} not found",
        /// The referenced town does not exist.
        MissingTown { town_id: i64 } => "town {town_id} does not exist",
    }
}

/// Port for reading and writing help requests.
///
/// Counter adjustments must be single store-side statements so concurrent
/// callers never lose an update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpRequestRepository: Send + Sync {
    /// Insert a new request with a zero assignee count.
    ///
    /// A `town_id` naming no town fails with `MissingTown`.
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError>;

    /// Overwrite the provided fields; `None` when no row matches. A
    /// `town_id` naming no town fails with `MissingTown`.
    async fn update(
        &self,
        id: HelpRequestId,
        changes: &HelpRequestChanges,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError>;

    /// Fetch one request by id.
    async fn find_by_id(
        &self,
        id: HelpRequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError>;

    /// List requests of `kind` that `owner` created or whose id is in
    /// `including`, newest first.
    ///
    /// An empty `including` slice matches no ids; only the ownership clause
    /// applies in that case.
    async fn list_for_user(
        &self,
        kind: HelpRequestKind,
        owner: &UserId,
        including: &[HelpRequestId],
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError>;

    /// Atomically add one to the assignee count and return the new value.
    async fn increment_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError>;

    /// Atomically subtract one from the assignee count, never going below
    /// zero, and return the new value.
    async fn decrement_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError>;

    /// Read summary rows for towns with any activity in the last 24 hours.
    async fn list_active_town_summaries(
        &self,
    ) -> Result<Vec<TownSummary>, HelpRequestRepositoryError>;
}
