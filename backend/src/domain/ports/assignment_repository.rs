//! Port for assignment persistence.

use async_trait::async_trait;

use crate::domain::{Assignment, AssignmentId, HelpRequestId, NewAssignment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by assignment repository adapters.
    pub enum AssignmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "assignment repository query failed: {message}",
        /// The referenced help request does not exist.
        MissingHelpRequest { id: i64 } =>
            "help request {id} does not exist",
        /// The user already holds an assignment on the request.
        Duplicate { help_request_id: i64, user_id: String } =>
            "user {user_id} is already assigned to help request {help_request_id}",
    }
}

/// Port for creating, reading and deleting assignment rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Insert an assignment row.
    async fn insert(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, AssignmentRepositoryError>;

    /// Fetch an assignment by id.
    async fn find_by_id(
        &self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError>;

    /// Fetch the assignment a user holds on a request, if any.
    async fn find_for_request_and_user(
        &self,
        help_request_id: HelpRequestId,
        user_id: &UserId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError>;

    /// All assignments for a request ordered by id.
    async fn list_for_request(
        &self,
        help_request_id: HelpRequestId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;

    /// Ids of every request the user is assigned to.
    async fn list_request_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HelpRequestId>, AssignmentRepositoryError>;

    /// Delete an assignment; `false` when no row matched.
    async fn delete(&self, id: AssignmentId) -> Result<bool, AssignmentRepositoryError>;
}
