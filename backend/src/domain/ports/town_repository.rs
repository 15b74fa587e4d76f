//! Port for town persistence.

use async_trait::async_trait;

use crate::domain::{Town, TownName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by town repository adapters.
    pub enum TownRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "town repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "town repository query failed: {message}",
        /// A town with the same name already exists.
        Duplicate { name: String } => "town {name} already exists",
    }
}

/// Port for looking up and creating towns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TownRepository: Send + Sync {
    /// Fetch a town by exact name.
    async fn find_by_name(&self, name: &TownName) -> Result<Option<Town>, TownRepositoryError>;

    /// Insert a town; names are unique.
    async fn insert(&self, name: &TownName) -> Result<Town, TownRepositoryError>;

    /// Every town ordered by name.
    async fn list(&self) -> Result<Vec<Town>, TownRepositoryError>;
}
