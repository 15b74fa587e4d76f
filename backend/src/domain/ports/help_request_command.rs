//! Driving port for ledger mutations.
//!
//! Inbound adapters create and edit help requests and move users on and off
//! them through this port. Implementations keep each request's assignee count
//! equal to the number of assignment rows that reference it.

use async_trait::async_trait;

use crate::domain::{
    Assignment, AssignmentId, Error, HelpRequest, HelpRequestChanges, HelpRequestId,
    NewAssignment, NewHelpRequest,
};

/// Driving port for help request and assignment writes.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use ayuda::domain::ports::HelpRequestCommand;
/// use ayuda::domain::{HelpRequestKind, HelpRequestLedger, NewAssignment, NewHelpRequest, UserId};
/// use ayuda::outbound::memory::InMemoryStore;
///
/// # async fn example() -> Result<(), ayuda::domain::Error> {
/// let store = Arc::new(InMemoryStore::default());
/// let ledger = HelpRequestLedger::new(store.clone(), store);
/// let owner = UserId::random();
/// let request = ledger
///     .create_request(NewHelpRequest::new(
///         HelpRequestKind::Necesita,
///         owner,
///         "Massanassa",
///         "600 000 000",
///     ))
///     .await?;
/// ledger
///     .assign(NewAssignment::new(request.id, UserId::random(), None))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpRequestCommand: Send + Sync {
    /// Validate and store a new request with zero assignees.
    async fn create_request(&self, request: NewHelpRequest) -> Result<HelpRequest, Error>;

    /// Overwrite the provided fields of an existing request.
    async fn edit_request(
        &self,
        id: HelpRequestId,
        changes: HelpRequestChanges,
    ) -> Result<HelpRequest, Error>;

    /// Record an assignment and bump the request's assignee count.
    async fn assign(&self, assignment: NewAssignment) -> Result<Assignment, Error>;

    /// Remove an assignment and lower the request's assignee count.
    async fn unassign(&self, id: AssignmentId) -> Result<(), Error>;
}
