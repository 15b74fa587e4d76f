//! Port for delivery point persistence.

use async_trait::async_trait;

use crate::domain::{DeliveryPoint, NewDeliveryPoint};

use super::define_port_error;

define_port_error! {
    /// Errors raised by delivery point repository adapters.
    pub enum DeliveryPointRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "delivery point repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "delivery point repository query failed: {message}",
    }
}

/// Port for registering and listing delivery points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryPointRepository: Send + Sync {
    /// Insert a validated delivery point.
    async fn insert(
        &self,
        point: &NewDeliveryPoint,
    ) -> Result<DeliveryPoint, DeliveryPointRepositoryError>;

    /// Every delivery point, newest first.
    async fn list_newest_first(&self) -> Result<Vec<DeliveryPoint>, DeliveryPointRepositoryError>;
}
