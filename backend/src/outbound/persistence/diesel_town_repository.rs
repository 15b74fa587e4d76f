//! PostgreSQL-backed `TownRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TownRepository, TownRepositoryError};
use crate::domain::{Town, TownId, TownName};

use super::error_mapping::{
    TOWN_NAME_UNIQUE_CONSTRAINT, map_diesel_error, map_pool_error, unique_violation,
};
use super::models::{NewTownRow, TownRow};
use super::pool::{DbPool, PoolError};
use super::schema::towns;

/// Diesel-backed implementation of the `TownRepository` port.
#[derive(Clone)]
pub struct DieselTownRepository {
    pool: DbPool,
}

impl DieselTownRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TownRepositoryError {
    map_pool_error(error, TownRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TownRepositoryError {
    map_diesel_error(error, TownRepositoryError::query, TownRepositoryError::connection)
}

fn row_to_town(row: TownRow) -> Result<Town, TownRepositoryError> {
    let name = TownName::new(&row.name)
        .map_err(|err| TownRepositoryError::query(format!("town {}: {err}", row.id)))?;
    Ok(Town {
        id: TownId::new(row.id),
        name,
    })
}

#[async_trait]
impl TownRepository for DieselTownRepository {
    async fn find_by_name(&self, name: &TownName) -> Result<Option<Town>, TownRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = towns::table
            .filter(towns::name.eq(name.as_ref()))
            .select(TownRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_town).transpose()
    }

    async fn insert(&self, name: &TownName) -> Result<Town, TownRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(towns::table)
            .values(&NewTownRow {
                name: name.as_ref(),
            })
            .returning(TownRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if unique_violation(&err) == Some(TOWN_NAME_UNIQUE_CONSTRAINT) {
                    TownRepositoryError::duplicate(name.to_string())
                } else {
                    diesel_error(err)
                }
            })?;
        row_to_town(row)
    }

    async fn list(&self) -> Result<Vec<Town>, TownRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TownRow> = towns::table
            .select(TownRow::as_select())
            .order_by(towns::name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_town).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn blank_stored_name_is_a_query_error() {
        let err = row_to_town(TownRow {
            id: 3,
            name: "  ".to_owned(),
        })
        .expect_err("blank name");
        assert!(matches!(err, TownRepositoryError::Query { .. }));
    }
}
