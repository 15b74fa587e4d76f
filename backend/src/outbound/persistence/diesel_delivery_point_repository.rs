//! PostgreSQL-backed `DeliveryPointRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryPointRepository, DeliveryPointRepositoryError};
use crate::domain::{
    CargoType, Coordinates, DeliveryPoint, DeliveryPointId, DeliveryPointStatus,
    NewDeliveryPoint, VehicleType,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DeliveryPointRow, NewDeliveryPointRow};
use super::pool::{DbPool, PoolError};
use super::schema::delivery_points;

/// Diesel-backed implementation of the `DeliveryPointRepository` port.
#[derive(Clone)]
pub struct DieselDeliveryPointRepository {
    pool: DbPool,
}

impl DieselDeliveryPointRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DeliveryPointRepositoryError {
    map_pool_error(error, DeliveryPointRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DeliveryPointRepositoryError {
    map_diesel_error(
        error,
        DeliveryPointRepositoryError::query,
        DeliveryPointRepositoryError::connection,
    )
}

fn parse_column<T>(raw: Option<String>, id: i64) -> Result<Option<T>, DeliveryPointRepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|err| {
            DeliveryPointRepositoryError::query(format!("delivery point {id}: {err}"))
        })
    })
    .transpose()
}

fn row_to_point(row: DeliveryPointRow) -> Result<DeliveryPoint, DeliveryPointRepositoryError> {
    let id = row.id;
    let invalid = |err: &dyn std::fmt::Display| {
        DeliveryPointRepositoryError::query(format!("delivery point {id}: {err}"))
    };
    let status = row
        .status
        .parse::<DeliveryPointStatus>()
        .map_err(|err| invalid(&err))?;
    let coordinates =
        Coordinates::from_parts(row.latitude, row.longitude).map_err(|err| invalid(&err))?;

    Ok(DeliveryPoint {
        id: DeliveryPointId::new(id),
        name: row.name,
        location: row.location,
        city: row.city,
        contact_name: row.contact_name,
        contact_phone: row.contact_phone,
        contact_email: row.contact_email,
        vehicle_type: parse_column::<VehicleType>(row.vehicle_type, id)?,
        cargo_type: parse_column::<CargoType>(row.cargo_type, id)?,
        schedule: row.schedule,
        additional_info: row.additional_info,
        coordinates,
        status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl DeliveryPointRepository for DieselDeliveryPointRepository {
    async fn insert(
        &self,
        point: &NewDeliveryPoint,
    ) -> Result<DeliveryPoint, DeliveryPointRepositoryError> {
        let new_row = NewDeliveryPointRow {
            name: &point.name,
            location: &point.location,
            city: point.city.as_deref(),
            contact_name: point.contact_name.as_deref(),
            contact_phone: &point.contact_phone,
            contact_email: point.contact_email.as_deref(),
            vehicle_type: point.vehicle_type.map(VehicleType::as_str),
            cargo_type: point.cargo_type.map(CargoType::as_str),
            schedule: point.schedule.as_deref(),
            additional_info: point.additional_info.as_deref(),
            latitude: point.coordinates.map(|c| c.latitude()),
            longitude: point.coordinates.map(|c| c.longitude()),
            status: point.status.as_str(),
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(delivery_points::table)
            .values(&new_row)
            .returning(DeliveryPointRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_point(row)
    }

    async fn list_newest_first(&self) -> Result<Vec<DeliveryPoint>, DeliveryPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<DeliveryPointRow> = delivery_points::table
            .select(DeliveryPointRow::as_select())
            .order_by((delivery_points::created_at.desc(), delivery_points::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_point).collect()
    }
}
