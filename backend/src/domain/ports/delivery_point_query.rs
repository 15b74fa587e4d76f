//! Driving port for delivery point reads.

use async_trait::async_trait;

use crate::domain::{DeliveryPoint, Error};

/// Driving port for listing delivery points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryPointQuery: Send + Sync {
    /// Every delivery point, newest first.
    async fn list(&self) -> Result<Vec<DeliveryPoint>, Error>;
}
