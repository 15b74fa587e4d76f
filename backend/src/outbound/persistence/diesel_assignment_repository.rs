//! PostgreSQL-backed `AssignmentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AssignmentRepository, AssignmentRepositoryError};
use crate::domain::{Assignment, AssignmentId, HelpRequestId, NewAssignment, UserId};

use super::error_mapping::{
    ASSIGNMENT_UNIQUE_CONSTRAINT, is_foreign_key_violation, map_diesel_error, map_pool_error,
    unique_violation,
};
use super::models::{AssignmentRow, NewAssignmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::help_request_assignments;

/// Diesel-backed implementation of the `AssignmentRepository` port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AssignmentRepositoryError {
    map_pool_error(error, AssignmentRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AssignmentRepositoryError {
    map_diesel_error(
        error,
        AssignmentRepositoryError::query,
        AssignmentRepositoryError::connection,
    )
}

/// Translate insert failures, recognising the duplicate and missing-request
/// constraints before falling back to the generic mapping.
fn insert_error(error: diesel::result::Error, input: &NewAssignment) -> AssignmentRepositoryError {
    if unique_violation(&error) == Some(ASSIGNMENT_UNIQUE_CONSTRAINT) {
        return AssignmentRepositoryError::duplicate(
            input.help_request_id.get(),
            input.user_id.to_string(),
        );
    }
    if is_foreign_key_violation(&error) {
        return AssignmentRepositoryError::missing_help_request(input.help_request_id.get());
    }
    diesel_error(error)
}

fn row_to_assignment(row: AssignmentRow) -> Assignment {
    Assignment {
        id: AssignmentId::new(row.id),
        help_request_id: HelpRequestId::new(row.help_request_id),
        user_id: UserId::from_uuid(row.user_id),
        phone_number: row.phone_number,
        created_at: row.created_at,
    }
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn insert(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, AssignmentRepositoryError> {
        let new_row = NewAssignmentRow {
            help_request_id: assignment.help_request_id.get(),
            user_id: *assignment.user_id.as_uuid(),
            phone_number: assignment.phone_number.as_deref(),
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(help_request_assignments::table)
            .values(&new_row)
            .returning(AssignmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| insert_error(err, assignment))?;
        Ok(row_to_assignment(row))
    }

    async fn find_by_id(
        &self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = help_request_assignments::table
            .find(id.get())
            .select(AssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_assignment))
    }

    async fn find_for_request_and_user(
        &self,
        help_request_id: HelpRequestId,
        user_id: &UserId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = help_request_assignments::table
            .filter(help_request_assignments::help_request_id.eq(help_request_id.get()))
            .filter(help_request_assignments::user_id.eq(*user_id.as_uuid()))
            .select(AssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_assignment))
    }

    async fn list_for_request(
        &self,
        help_request_id: HelpRequestId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AssignmentRow> = help_request_assignments::table
            .filter(help_request_assignments::help_request_id.eq(help_request_id.get()))
            .select(AssignmentRow::as_select())
            .order_by(help_request_assignments::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_assignment).collect())
    }

    async fn list_request_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HelpRequestId>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<i64> = help_request_assignments::table
            .filter(help_request_assignments::user_id.eq(*user_id.as_uuid()))
            .select(help_request_assignments::help_request_id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(HelpRequestId::new).collect())
    }

    async fn delete(&self, id: AssignmentId) -> Result<bool, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(help_request_assignments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
