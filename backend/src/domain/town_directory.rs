//! Town directory service.
//!
//! Looks towns up by name and creates them on demand. Town names are unique;
//! concurrent creators of the same name both end up with the single stored
//! row. The daily activity summary is served by the help request ledger.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{TownCommand, TownQuery, TownRepository, TownRepositoryError};
use crate::domain::{Error, ErrorCode, Town, TownName};

/// Town service implementing [`TownCommand`] and [`TownQuery`].
#[derive(Clone)]
pub struct TownDirectory<T> {
    towns: Arc<T>,
}

impl<T> TownDirectory<T> {
    /// Create a directory over the town store.
    pub fn new(towns: Arc<T>) -> Self {
        Self { towns }
    }
}

fn map_town_error(error: TownRepositoryError) -> Error {
    match error {
        TownRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("town repository unavailable: {message}"))
        }
        TownRepositoryError::Query { message } => {
            Error::internal(format!("town repository error: {message}"))
        }
        TownRepositoryError::Duplicate { name } => Error::conflict(format!(
            "town {name} already exists"
        ))
        .with_details(json!({ "field": "name", "code": "duplicate_town" })),
    }
}

#[async_trait]
impl<T> TownCommand for TownDirectory<T>
where
    T: TownRepository,
{
    async fn create(&self, name: TownName) -> Result<Town, Error> {
        let town = self.towns.insert(&name).await.map_err(map_town_error)?;
        info!(town_id = %town.id, name = %town.name, "town created");
        Ok(town)
    }

    async fn create_if_not_exists(&self, name: TownName) -> Result<Town, Error> {
        if let Some(existing) = self.get_by_name(name.clone()).await? {
            return Ok(existing);
        }

        match self.create(name.clone()).await {
            Err(err) if err.code() == ErrorCode::Conflict => {
                debug!(name = %name, "town created concurrently; reading existing row");
                self.get_by_name(name.clone())
                    .await?
                    .ok_or_else(|| Error::internal(format!("town {name} vanished after conflict")))
            }
            result => result,
        }
    }
}

#[async_trait]
impl<T> TownQuery for TownDirectory<T>
where
    T: TownRepository,
{
    async fn get_by_name(&self, name: TownName) -> Result<Option<Town>, Error> {
        self.towns.find_by_name(&name).await.map_err(map_town_error)
    }

    async fn list(&self) -> Result<Vec<Town>, Error> {
        self.towns.list().await.map_err(|err| {
            warn!(error = %err, "listing towns failed");
            map_town_error(err)
        })
    }
}
