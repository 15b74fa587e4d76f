//! Driving port for delivery point registration.

use async_trait::async_trait;

use crate::domain::{DeliveryPoint, DeliveryPointDraft, Error};

/// Driving port for registering delivery points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryPointCommand: Send + Sync {
    /// Validate and store a delivery point. New points start active.
    async fn register(&self, draft: DeliveryPointDraft) -> Result<DeliveryPoint, Error>;
}
