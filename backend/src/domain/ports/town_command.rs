//! Driving port for town creation.

use async_trait::async_trait;

use crate::domain::{Error, Town, TownName};

/// Driving port for creating towns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TownCommand: Send + Sync {
    /// Create a town; fails with `conflict` when the name is taken.
    async fn create(&self, name: TownName) -> Result<Town, Error>;

    /// Return the existing town with this name or create it.
    async fn create_if_not_exists(&self, name: TownName) -> Result<Town, Error>;
}
