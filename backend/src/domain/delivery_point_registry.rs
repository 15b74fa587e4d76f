//! Delivery point registry service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    DeliveryPointCommand, DeliveryPointQuery, DeliveryPointRepository,
    DeliveryPointRepositoryError,
};
use crate::domain::{
    DeliveryPoint, DeliveryPointDraft, DeliveryPointValidationError, Error, NewDeliveryPoint,
};

/// Delivery point service implementing [`DeliveryPointCommand`] and
/// [`DeliveryPointQuery`].
#[derive(Clone)]
pub struct DeliveryPointRegistry<R> {
    points: Arc<R>,
}

impl<R> DeliveryPointRegistry<R> {
    /// Create a registry over the given store.
    pub fn new(points: Arc<R>) -> Self {
        Self { points }
    }
}

fn map_repository_error(error: DeliveryPointRepositoryError) -> Error {
    match error {
        DeliveryPointRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("delivery point repository unavailable: {message}"))
        }
        DeliveryPointRepositoryError::Query { message } => {
            Error::internal(format!("delivery point repository error: {message}"))
        }
    }
}

fn validation_error(error: DeliveryPointValidationError) -> Error {
    let code = match error {
        DeliveryPointValidationError::MissingField { .. } => "missing_field",
        DeliveryPointValidationError::PartialCoordinates => "partial_coordinates",
        DeliveryPointValidationError::LatitudeOutOfRange
        | DeliveryPointValidationError::LongitudeOutOfRange => "out_of_range",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": code,
    }))
}

#[async_trait]
impl<R> DeliveryPointCommand for DeliveryPointRegistry<R>
where
    R: DeliveryPointRepository,
{
    async fn register(&self, draft: DeliveryPointDraft) -> Result<DeliveryPoint, Error> {
        let point = NewDeliveryPoint::try_from(draft).map_err(validation_error)?;
        let stored = self
            .points
            .insert(&point)
            .await
            .map_err(map_repository_error)?;
        info!(delivery_point_id = %stored.id, name = %stored.name, "delivery point registered");
        Ok(stored)
    }
}

#[async_trait]
impl<R> DeliveryPointQuery for DeliveryPointRegistry<R>
where
    R: DeliveryPointRepository,
{
    async fn list(&self) -> Result<Vec<DeliveryPoint>, Error> {
        self.points.list_newest_first().await.map_err(|err| {
            warn!(error = %err, "listing delivery points failed");
            map_repository_error(err)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockDeliveryPointRepository;
    use crate::domain::{DeliveryPointId, DeliveryPointStatus, ErrorCode, VehicleType};

    #[fixture]
    fn draft() -> DeliveryPointDraft {
        DeliveryPointDraft {
            name: "Nave 4".to_owned(),
            location: "Polígono Sur".to_owned(),
            city: Some(" ".to_owned()),
            contact_phone: "611 000 000".to_owned(),
            vehicle_type: Some(VehicleType::LargeVan),
            latitude: Some(39.42),
            longitude: Some(-0.41),
            ..DeliveryPointDraft::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_normalised_point(draft: DeliveryPointDraft) {
        let mut points = MockDeliveryPointRepository::new();
        points
            .expect_insert()
            .withf(|point| point.city.is_none() && point.status == DeliveryPointStatus::Active)
            .times(1)
            .returning(|point| {
                Ok(DeliveryPoint {
                    id: DeliveryPointId::new(1),
                    name: point.name.clone(),
                    location: point.location.clone(),
                    city: point.city.clone(),
                    contact_name: point.contact_name.clone(),
                    contact_phone: point.contact_phone.clone(),
                    contact_email: point.contact_email.clone(),
                    vehicle_type: point.vehicle_type,
                    cargo_type: point.cargo_type,
                    schedule: point.schedule.clone(),
                    additional_info: point.additional_info.clone(),
                    coordinates: point.coordinates,
                    status: point.status,
                    created_at: Utc::now(),
                })
            });

        let registry = DeliveryPointRegistry::new(Arc::new(points));

        let stored = registry.register(draft).await.expect("registered");
        assert_eq!(stored.vehicle_type, Some(VehicleType::LargeVan));
        assert!(stored.coordinates.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_missing_phone_before_store(mut draft: DeliveryPointDraft) {
        draft.contact_phone.clear();
        let registry = DeliveryPointRegistry::new(Arc::new(MockDeliveryPointRepository::new()));

        let error = registry.register(draft).await.expect_err("invalid");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d.get("field")),
            Some(&json!("contactPhone"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn list_propagates_store_failures() {
        let mut points = MockDeliveryPointRepository::new();
        points
            .expect_list_newest_first()
            .times(1)
            .return_once(|| Err(DeliveryPointRepositoryError::query("timeout")));

        let registry = DeliveryPointRegistry::new(Arc::new(points));

        let error = registry.list().await.expect_err("fails");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
