//! Request-assignment ledger.
//!
//! The ledger implements the help request driving ports over the help request
//! and assignment repositories. Its one invariant is that every request's
//! `asignees_count` equals the number of assignment rows referencing it. Each
//! counter change is a single atomic store statement; the insert/delete and
//! the counter adjustment are still separate steps, so a failure between them
//! is surfaced to the caller without being rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, HelpRequestCommand, HelpRequestQuery,
    HelpRequestRepository, HelpRequestRepositoryError,
};
use crate::domain::{
    Assignment, AssignmentId, Error, HelpRequest, HelpRequestChanges, HelpRequestId,
    HelpRequestKind, HelpRequestValidationError, NewAssignment, NewHelpRequest, TownSummary,
    UserId,
};

/// Ledger service implementing [`HelpRequestCommand`] and
/// [`HelpRequestQuery`].
#[derive(Clone)]
pub struct HelpRequestLedger<H, A> {
    requests: Arc<H>,
    assignments: Arc<A>,
}

impl<H, A> HelpRequestLedger<H, A> {
    /// Create a ledger over the given repositories.
    pub fn new(requests: Arc<H>, assignments: Arc<A>) -> Self {
        Self {
            requests,
            assignments,
        }
    }
}

fn map_help_request_error(error: HelpRequestRepositoryError) -> Error {
    match error {
        HelpRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("help request repository unavailable: {message}"))
        }
        HelpRequestRepositoryError::Query { message } => {
            Error::internal(format!("help request repository error: {message}"))
        }
        HelpRequestRepositoryError::NotFound { id } => {
            Error::not_found(format!("help request {id} not found"))
        }
        HelpRequestRepositoryError::MissingTown { town_id } => {
            Error::invalid_request(format!("town {town_id} does not exist")).with_details(json!({
                "field": "townId",
                "code": "invalid_value",
            }))
        }
    }
}

fn map_assignment_error(error: AssignmentRepositoryError) -> Error {
    match error {
        AssignmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("assignment repository unavailable: {message}"))
        }
        AssignmentRepositoryError::Query { message } => {
            Error::internal(format!("assignment repository error: {message}"))
        }
        AssignmentRepositoryError::MissingHelpRequest { id } => {
            Error::not_found(format!("help request {id} not found"))
        }
        AssignmentRepositoryError::Duplicate {
            help_request_id,
            user_id,
        } => duplicate_assignment(help_request_id, &user_id),
    }
}

fn duplicate_assignment(help_request_id: i64, user_id: &str) -> Error {
    Error::conflict("user is already assigned to this help request").with_details(json!({
        "helpRequestId": help_request_id,
        "userId": user_id,
        "code": "duplicate_assignment",
    }))
}

fn validation_error(error: HelpRequestValidationError) -> Error {
    let code = match error {
        HelpRequestValidationError::EmptyChanges => "empty_changes",
        _ => "blank_field",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": code,
    }))
}

impl<H, A> HelpRequestLedger<H, A>
where
    H: HelpRequestRepository,
    A: AssignmentRepository,
{
    async fn list_for_user(
        &self,
        kind: HelpRequestKind,
        user_id: &UserId,
        including: &[HelpRequestId],
    ) -> Result<Vec<HelpRequest>, Error> {
        self.requests
            .list_for_user(kind, user_id, including)
            .await
            .map_err(|err| {
                warn!(%user_id, %kind, error = %err, "listing help requests failed");
                map_help_request_error(err)
            })
    }
}

#[async_trait]
impl<H, A> HelpRequestCommand for HelpRequestLedger<H, A>
where
    H: HelpRequestRepository,
    A: AssignmentRepository,
{
    async fn create_request(&self, request: NewHelpRequest) -> Result<HelpRequest, Error> {
        request.validate().map_err(validation_error)?;
        let created = self
            .requests
            .insert(&request)
            .await
            .map_err(map_help_request_error)?;
        info!(
            help_request_id = %created.id,
            kind = %created.kind,
            user_id = %created.user_id,
            "help request created"
        );
        Ok(created)
    }

    async fn edit_request(
        &self,
        id: HelpRequestId,
        changes: HelpRequestChanges,
    ) -> Result<HelpRequest, Error> {
        changes.validate().map_err(validation_error)?;
        let updated = self
            .requests
            .update(id, &changes)
            .await
            .map_err(map_help_request_error)?
            .ok_or_else(|| Error::not_found(format!("help request {id} not found")))?;
        debug!(help_request_id = %id, "help request edited");
        Ok(updated)
    }

    async fn assign(&self, assignment: NewAssignment) -> Result<Assignment, Error> {
        let request_id = assignment.help_request_id;
        let existing = self
            .assignments
            .find_for_request_and_user(request_id, &assignment.user_id)
            .await
            .map_err(map_assignment_error)?;
        if existing.is_some() {
            return Err(duplicate_assignment(
                request_id.get(),
                assignment.user_id.as_ref(),
            ));
        }

        let created = self
            .assignments
            .insert(&assignment)
            .await
            .map_err(map_assignment_error)?;
        let count = self
            .requests
            .increment_asignees(request_id)
            .await
            .map_err(|err| {
                warn!(
                    help_request_id = %request_id,
                    assignment_id = %created.id,
                    error = %err,
                    "assignment stored but counter increment failed"
                );
                map_help_request_error(err)
            })?;
        info!(
            help_request_id = %request_id,
            assignment_id = %created.id,
            asignees_count = count,
            "user assigned to help request"
        );
        Ok(created)
    }

    async fn unassign(&self, id: AssignmentId) -> Result<(), Error> {
        let assignment = self
            .assignments
            .find_by_id(id)
            .await
            .map_err(map_assignment_error)?
            .ok_or_else(|| Error::not_found(format!("assignment {id} not found")))?;

        let deleted = self
            .assignments
            .delete(id)
            .await
            .map_err(map_assignment_error)?;
        if !deleted {
            return Err(Error::not_found(format!("assignment {id} not found")));
        }

        let request_id = assignment.help_request_id;
        let count = self
            .requests
            .decrement_asignees(request_id)
            .await
            .map_err(|err| {
                warn!(
                    help_request_id = %request_id,
                    assignment_id = %id,
                    error = %err,
                    "assignment deleted but counter decrement failed"
                );
                map_help_request_error(err)
            })?;
        info!(
            help_request_id = %request_id,
            assignment_id = %id,
            asignees_count = count,
            "user unassigned from help request"
        );
        Ok(())
    }
}

#[async_trait]
impl<H, A> HelpRequestQuery for HelpRequestLedger<H, A>
where
    H: HelpRequestRepository,
    A: AssignmentRepository,
{
    async fn get_one(&self, id: HelpRequestId) -> Result<HelpRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_help_request_error)?
            .ok_or_else(|| Error::not_found(format!("help request {id} not found")))
    }

    async fn requests_by_user(&self, user_id: Option<UserId>) -> Result<Vec<HelpRequest>, Error> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };
        let assigned = self
            .assignments
            .list_request_ids_for_user(&user_id)
            .await
            .map_err(|err| {
                warn!(%user_id, error = %err, "listing user assignments failed");
                map_assignment_error(err)
            })?;
        self.list_for_user(HelpRequestKind::Necesita, &user_id, &assigned)
            .await
    }

    async fn offers_by_user(&self, user_id: Option<UserId>) -> Result<Vec<HelpRequest>, Error> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };
        self.list_for_user(HelpRequestKind::Ofrece, &user_id, &[])
            .await
    }

    async fn assignments(&self, help_request_id: HelpRequestId) -> Result<Vec<Assignment>, Error> {
        self.assignments
            .list_for_request(help_request_id)
            .await
            .map_err(map_assignment_error)
    }

    async fn todays_count_by_town(&self) -> Result<Vec<TownSummary>, Error> {
        let summaries = self
            .requests
            .list_active_town_summaries()
            .await
            .map_err(|err| {
                warn!(error = %err, "reading town summary failed");
                map_help_request_error(err)
            })?;
        Ok(summaries
            .into_iter()
            .filter(TownSummary::has_activity)
            .collect())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
