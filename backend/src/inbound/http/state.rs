//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    AssignmentRepository, DeliveryPointCommand, DeliveryPointQuery, DeliveryPointRepository,
    HelpRequestCommand, HelpRequestQuery, HelpRequestRepository, TownCommand, TownQuery,
    TownRepository,
};
use crate::domain::{DeliveryPointRegistry, HelpRequestLedger, TownDirectory};
use crate::outbound::memory::InMemoryStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub help_requests: Arc<dyn HelpRequestCommand>,
    pub help_requests_query: Arc<dyn HelpRequestQuery>,
    pub towns: Arc<dyn TownCommand>,
    pub towns_query: Arc<dyn TownQuery>,
    pub delivery_points: Arc<dyn DeliveryPointCommand>,
    pub delivery_points_query: Arc<dyn DeliveryPointQuery>,
}

impl HttpState {
    /// Wire the domain services over a set of store adapters.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ayuda::inbound::http::state::HttpState;
    /// use ayuda::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::from_stores(store.clone(), store.clone(), store.clone(), store);
    /// let _ledger = state.help_requests.clone();
    /// ```
    pub fn from_stores<H, A, T, D>(
        requests: Arc<H>,
        assignments: Arc<A>,
        towns: Arc<T>,
        delivery_points: Arc<D>,
    ) -> Self
    where
        H: HelpRequestRepository + 'static,
        A: AssignmentRepository + 'static,
        T: TownRepository + 'static,
        D: DeliveryPointRepository + 'static,
    {
        let ledger = Arc::new(HelpRequestLedger::new(requests, assignments));
        let directory = Arc::new(TownDirectory::new(towns));
        let registry = Arc::new(DeliveryPointRegistry::new(delivery_points));
        Self {
            help_requests: ledger.clone(),
            help_requests_query: ledger,
            towns: directory.clone(),
            towns_query: directory,
            delivery_points: registry.clone(),
            delivery_points_query: registry,
        }
    }

    /// State backed entirely by one [`InMemoryStore`].
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::from_stores(store.clone(), store.clone(), store.clone(), store)
    }
}
