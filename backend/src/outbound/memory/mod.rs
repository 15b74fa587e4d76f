//! In-process store implementing every driven port.
//!
//! The server falls back to this adapter when no database URL is configured,
//! and integration tests use it to exercise the full HTTP stack. Each port
//! call runs under one mutex acquisition, so single-statement operations such
//! as the counter adjustments are atomic with respect to each other.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, DeliveryPointRepository,
    DeliveryPointRepositoryError, HelpRequestRepository, HelpRequestRepositoryError,
    TownRepository, TownRepositoryError,
};
use crate::domain::{
    Assignment, AssignmentId, DeliveryPoint, DeliveryPointId, HelpRequest, HelpRequestChanges,
    HelpRequestId, HelpRequestKind, NewAssignment, NewDeliveryPoint, NewHelpRequest, Town, TownId,
    TownName, TownSummary, UserId,
};

#[derive(Debug, Default)]
struct State {
    requests: BTreeMap<HelpRequestId, HelpRequest>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    towns: BTreeMap<TownId, Town>,
    delivery_points: Vec<DeliveryPoint>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn require_town(&self, town_id: Option<TownId>) -> Result<(), HelpRequestRepositoryError> {
        match town_id {
            Some(town_id) if !self.towns.contains_key(&town_id) => {
                Err(HelpRequestRepositoryError::missing_town(town_id.get()))
            }
            _ => Ok(()),
        }
    }

    fn summaries(&self) -> Vec<TownSummary> {
        let since = Utc::now() - Duration::hours(24);
        let mut towns: Vec<&Town> = self.towns.values().collect();
        towns.sort_by(|a, b| a.name.cmp(&b.name));

        towns
            .into_iter()
            .map(|town| {
                let in_town = self
                    .requests
                    .values()
                    .filter(|request| request.town_id == Some(town.id));
                let mut summary = TownSummary {
                    town_id: town.id,
                    town_name: town.name.to_string(),
                    offers_last_24h: 0,
                    needs_last_24h: 0,
                    unassigned_needs: 0,
                };
                for request in in_town {
                    let recent = request.created_at >= since;
                    match request.kind {
                        HelpRequestKind::Ofrece if recent => summary.offers_last_24h += 1,
                        HelpRequestKind::Necesita => {
                            if recent {
                                summary.needs_last_24h += 1;
                            }
                            if request.asignees_count == 0 {
                                summary.unassigned_needs += 1;
                            }
                        }
                        HelpRequestKind::Ofrece => {}
                    }
                }
                summary
            })
            .filter(TownSummary::has_activity)
            .collect()
    }
}

/// Mutex-guarded store shared by every port implementation.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use ayuda::domain::HelpRequestLedger;
/// use ayuda::outbound::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::default());
/// let _ledger = HelpRequestLedger::new(store.clone(), store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock<E>(&self, poisoned: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state
            .lock()
            .map_err(|err| poisoned(format!("in-memory store poisoned: {err}")))
    }

    /// Override a request's creation time. Lets tests age rows out of the
    /// 24-hour summary window.
    pub fn backdate_request(&self, id: HelpRequestId, hours: i64) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match state.requests.get_mut(&id) {
            Some(request) => {
                request.created_at = Utc::now() - Duration::hours(hours);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl HelpRequestRepository for InMemoryStore {
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError> {
        let mut state = self.lock(HelpRequestRepositoryError::query)?;
        state.require_town(request.town_id)?;
        let id = HelpRequestId::new(state.next_id());
        let stored = HelpRequest {
            id,
            kind: request.kind,
            user_id: request.user_id.clone(),
            town_id: request.town_id,
            location: request.location.clone(),
            contact_info: request.contact_info.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            help_types: request.help_types.clone(),
            people_count: request.people_count,
            urgency: request.urgency.clone(),
            status: request.status_or_default().to_owned(),
            asignees_count: 0,
            created_at: Utc::now(),
        };
        state.requests.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: HelpRequestId,
        changes: &HelpRequestChanges,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut state = self.lock(HelpRequestRepositoryError::query)?;
        if !state.requests.contains_key(&id) {
            return Ok(None);
        }
        state.require_town(changes.town_id)?;
        Ok(state.requests.get_mut(&id).map(|request| {
            changes.apply_to(request);
            request.clone()
        }))
    }

    async fn find_by_id(
        &self,
        id: HelpRequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let state = self.lock(HelpRequestRepositoryError::query)?;
        Ok(state.requests.get(&id).cloned())
    }

    async fn list_for_user(
        &self,
        kind: HelpRequestKind,
        owner: &UserId,
        including: &[HelpRequestId],
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let state = self.lock(HelpRequestRepositoryError::query)?;
        Ok(state
            .requests
            .values()
            .rev()
            .filter(|request| request.kind == kind)
            .filter(|request| request.is_owned_by(owner) || including.contains(&request.id))
            .cloned()
            .collect())
    }

    async fn increment_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError> {
        let mut state = self.lock(HelpRequestRepositoryError::query)?;
        let request = state
            .requests
            .get_mut(&id)
            .ok_or_else(|| HelpRequestRepositoryError::not_found(id.get()))?;
        request.asignees_count += 1;
        Ok(request.asignees_count)
    }

    async fn decrement_asignees(
        &self,
        id: HelpRequestId,
    ) -> Result<u32, HelpRequestRepositoryError> {
        let mut state = self.lock(HelpRequestRepositoryError::query)?;
        let request = state
            .requests
            .get_mut(&id)
            .ok_or_else(|| HelpRequestRepositoryError::not_found(id.get()))?;
        request.asignees_count = request.asignees_count.saturating_sub(1);
        Ok(request.asignees_count)
    }

    async fn list_active_town_summaries(
        &self,
    ) -> Result<Vec<TownSummary>, HelpRequestRepositoryError> {
        let state = self.lock(HelpRequestRepositoryError::query)?;
        Ok(state.summaries())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn insert(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, AssignmentRepositoryError> {
        let mut state = self.lock(AssignmentRepositoryError::query)?;
        let request_id = assignment.help_request_id;
        if !state.requests.contains_key(&request_id) {
            return Err(AssignmentRepositoryError::missing_help_request(request_id.get()));
        }
        let duplicate = state.assignments.values().any(|existing| {
            existing.help_request_id == request_id && existing.user_id == assignment.user_id
        });
        if duplicate {
            return Err(AssignmentRepositoryError::duplicate(
                request_id.get(),
                assignment.user_id.to_string(),
            ));
        }

        let id = AssignmentId::new(state.next_id());
        let stored = Assignment {
            id,
            help_request_id: request_id,
            user_id: assignment.user_id.clone(),
            phone_number: assignment.phone_number.clone(),
            created_at: Utc::now(),
        };
        state.assignments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state.assignments.get(&id).cloned())
    }

    async fn find_for_request_and_user(
        &self,
        help_request_id: HelpRequestId,
        user_id: &UserId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .values()
            .find(|a| a.help_request_id == help_request_id && &a.user_id == user_id)
            .cloned())
    }

    async fn list_for_request(
        &self,
        help_request_id: HelpRequestId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .values()
            .filter(|a| a.help_request_id == help_request_id)
            .cloned()
            .collect())
    }

    async fn list_request_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HelpRequestId>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .values()
            .filter(|a| &a.user_id == user_id)
            .map(|a| a.help_request_id)
            .collect())
    }

    async fn delete(&self, id: AssignmentId) -> Result<bool, AssignmentRepositoryError> {
        let mut state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state.assignments.remove(&id).is_some())
    }
}

#[async_trait]
impl TownRepository for InMemoryStore {
    async fn find_by_name(&self, name: &TownName) -> Result<Option<Town>, TownRepositoryError> {
        let state = self.lock(TownRepositoryError::query)?;
        Ok(state.towns.values().find(|t| &t.name == name).cloned())
    }

    async fn insert(&self, name: &TownName) -> Result<Town, TownRepositoryError> {
        let mut state = self.lock(TownRepositoryError::query)?;
        if state.towns.values().any(|t| &t.name == name) {
            return Err(TownRepositoryError::duplicate(name.to_string()));
        }
        let id = TownId::new(state.next_id());
        let town = Town {
            id,
            name: name.clone(),
        };
        state.towns.insert(id, town.clone());
        Ok(town)
    }

    async fn list(&self) -> Result<Vec<Town>, TownRepositoryError> {
        let state = self.lock(TownRepositoryError::query)?;
        let mut towns: Vec<Town> = state.towns.values().cloned().collect();
        towns.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(towns)
    }
}

#[async_trait]
impl DeliveryPointRepository for InMemoryStore {
    async fn insert(
        &self,
        point: &NewDeliveryPoint,
    ) -> Result<DeliveryPoint, DeliveryPointRepositoryError> {
        let mut state = self.lock(DeliveryPointRepositoryError::query)?;
        let stored = DeliveryPoint {
            id: DeliveryPointId::new(state.next_id()),
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
        };
        state.delivery_points.push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<DeliveryPoint>, DeliveryPointRepositoryError> {
        let state = self.lock(DeliveryPointRepositoryError::query)?;
        Ok(state.delivery_points.iter().rev().cloned().collect())
    }
}
