//! Driving port for town reads.

use async_trait::async_trait;

use crate::domain::{Error, Town, TownName};

/// Driving port for looking up and listing towns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TownQuery: Send + Sync {
    /// Look up a town by exact name.
    async fn get_by_name(&self, name: TownName) -> Result<Option<Town>, Error>;

    /// Every town ordered by name.
    async fn list(&self) -> Result<Vec<Town>, Error>;
}
