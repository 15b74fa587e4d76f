//! PostgreSQL-backed `HelpRequestRepository` implementation using Diesel ORM.
//!
//! Counter adjustments are single `UPDATE ... RETURNING` statements evaluated
//! by the database, so concurrent assigns never overwrite each other.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HelpRequestRepository, HelpRequestRepositoryError};
use crate::domain::{
    HelpRequest, HelpRequestChanges, HelpRequestId, HelpRequestKind, NewHelpRequest, TownId,
    TownSummary, UserId,
};

use super::error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{HelpRequestRow, HelpRequestUpdate, NewHelpRequestRow, TownSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{help_requests, town_help_request_summary};

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two integers.
    fn greatest(a: Integer, b: Integer) -> Integer;
}

/// Diesel-backed implementation of the `HelpRequestRepository` port.
#[derive(Clone)]
pub struct DieselHelpRequestRepository {
    pool: DbPool,
}

impl DieselHelpRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HelpRequestRepositoryError {
    map_pool_error(error, HelpRequestRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> HelpRequestRepositoryError {
    map_diesel_error(
        error,
        HelpRequestRepositoryError::query,
        HelpRequestRepositoryError::connection,
    )
}

/// `town_id` is the only foreign key written by inserts and updates.
fn write_error(
    error: diesel::result::Error,
    town_id: Option<TownId>,
) -> HelpRequestRepositoryError {
    match town_id {
        Some(town_id) if is_foreign_key_violation(&error) => {
            HelpRequestRepositoryError::missing_town(town_id.get())
        }
        _ => diesel_error(error),
    }
}

fn to_db_count(value: u32, field: &str) -> Result<i32, HelpRequestRepositoryError> {
    i32::try_from(value)
        .map_err(|_| HelpRequestRepositoryError::query(format!("{field} out of range")))
}

/// Counters are guarded by `CHECK (>= 0)` constraints.
fn from_db_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn row_to_request(row: HelpRequestRow) -> Result<HelpRequest, HelpRequestRepositoryError> {
    let kind: HelpRequestKind = row.request_type.parse().map_err(|err| {
        HelpRequestRepositoryError::query(format!("help request {}: {err}", row.id))
    })?;
    Ok(HelpRequest {
        id: HelpRequestId::new(row.id),
        kind,
        user_id: UserId::from_uuid(row.user_id),
        town_id: row.town_id.map(TownId::new),
        location: row.location,
        contact_info: row.contact_info,
        name: row.name,
        description: row.description,
        help_types: row.help_type,
        people_count: row.number_of_people.map(from_db_count),
        urgency: row.urgency,
        status: row.status,
        asignees_count: from_db_count(row.asignees_count),
        created_at: row.created_at,
    })
}

fn rows_to_requests(
    rows: Vec<HelpRequestRow>,
) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
    rows.into_iter().map(row_to_request).collect()
}

fn row_to_summary(row: TownSummaryRow) -> TownSummary {
    TownSummary {
        town_id: TownId::new(row.town_id),
        town_name: row.town_name,
        offers_last_24h: from_db_count(row.offers_last_24h),
        needs_last_24h: from_db_count(row.needs_last_24h),
        unassigned_needs: from_db_count(row.unassigned_needs),
    }
}

#[async_trait]
impl HelpRequestRepository for DieselHelpRequestRepository {
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError> {
        let number_of_people = request
            .people_count
            .map(|count| to_db_count(count, "people count"))
            .transpose()?;
        let new_row = NewHelpRequestRow {
            request_type: request.kind.as_str(),
            user_id: *request.user_id.as_uuid(),
            town_id: request.town_id.map(TownId::get),
            location: &request.location,
            contact_info: &request.contact_info,
            name: request.name.as_deref(),
            description: request.description.as_deref(),
            help_type: &request.help_types,
            number_of_people,
            urgency: request.urgency.as_deref(),
            status: request.status_or_default(),
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(help_requests::table)
            .values(&new_row)
            .returning(HelpRequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| write_error(err, request.town_id))?;
        row_to_request(row)
    }

    async fn update(
        &self,
        id: HelpRequestId,
        changes: &HelpRequestChanges,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let number_of_people = changes
            .people_count
            .map(|count| to_db_count(count, "people count"))
            .transpose()?;
        let update = HelpRequestUpdate {
            request_type: changes.kind.map(HelpRequestKind::as_str),
            town_id: changes.town_id.map(TownId::get),
            location: changes.location.as_deref(),
            contact_info: changes.contact_info.as_deref(),
            name: changes.name.as_deref(),
            description: changes.description.as_deref(),
            help_type: changes.help_types.as_deref(),
            number_of_people,
            urgency: changes.urgency.as_deref(),
            status: changes.status.as_deref(),
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(help_requests::table.find(id.get()))
            .set(&update)
            .returning(HelpRequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| write_error(err, changes.town_id))?;
        row.map(row_to_request).transpose()
    }

    async fn find_by_id(
        &self,
        id: HelpRequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = help_requests::table
            .find(id.get())
            .select(HelpRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn list_for_user(
        &self,
        kind: HelpRequestKind,
        owner: &UserId,
        including: &[HelpRequestId],
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let mut query = help_requests::table
            .filter(help_requests::request_type.eq(kind.as_str()))
            .select(HelpRequestRow::as_select())
            .order_by(help_requests::created_at.desc())
            .into_boxed();

        // `id = ANY('{}')` would match nothing anyway; keep the SQL explicit.
        query = if including.is_empty() {
            query.filter(help_requests::user_id.eq(*owner.as_uuid()))
        } else {
            let ids: Vec<i64> = including.iter().map(|id| id.get()).collect();
            query.filter(
                help_requests::user_id
                    .eq(*owner.as_uuid())
                    .or(help_requests::id.eq_any(ids)),
            )
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = query.load(&mut conn).await.map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn increment_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: Option<i32> = diesel::update(help_requests::table.find(id.get()))
            .set(help_requests::asignees_count.eq(help_requests::asignees_count + 1))
            .returning(help_requests::asignees_count)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        count
            .map(from_db_count)
            .ok_or_else(|| HelpRequestRepositoryError::not_found(id.get()))
    }

    async fn decrement_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: Option<i32> = diesel::update(help_requests::table.find(id.get()))
            .set(help_requests::asignees_count.eq(greatest(help_requests::asignees_count - 1, 0)))
            .returning(help_requests::asignees_count)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        count
            .map(from_db_count)
            .ok_or_else(|| HelpRequestRepositoryError::not_found(id.get()))
    }

    async fn list_active_town_summaries(
        &self,
    ) -> Result<Vec<TownSummary>, HelpRequestRepositoryError> {
        use town_help_request_summary::dsl as summary;

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TownSummaryRow> = summary::town_help_request_summary
            .filter(
                summary::offers_last_24h
                    .gt(0)
                    .or(summary::needs_last_24h.gt(0))
                    .or(summary::unassigned_needs.gt(0)),
            )
            .select(TownSummaryRow::as_select())
            .order_by(summary::town_name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }
}
