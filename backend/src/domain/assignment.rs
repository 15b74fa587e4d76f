//! Assignment records linking a user to a help request they claimed.
//!
//! Assignments are created by `assign` and destroyed by `unassign`; they are
//! never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, HelpRequestId, UserId};

/// Persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub help_request_id: HelpRequestId,
    pub user_id: UserId,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for `assign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub help_request_id: HelpRequestId,
    pub user_id: UserId,
    pub phone_number: Option<String>,
}

impl NewAssignment {
    /// Build an assignment request, dropping a blank phone number.
    ///
    /// # Examples
    /// ```
    /// use ayuda::domain::{HelpRequestId, NewAssignment, UserId};
    ///
    /// let input = NewAssignment::new(HelpRequestId::new(3), UserId::random(), Some("  ".into()));
    /// assert!(input.phone_number.is_none());
    /// ```
    pub fn new(
        help_request_id: HelpRequestId,
        user_id: UserId,
        phone_number: Option<String>,
    ) -> Self {
        let phone_number = phone_number
            .map(|phone| phone.trim().to_owned())
            .filter(|phone| !phone.is_empty());
        Self {
            help_request_id,
            user_id,
            phone_number,
        }
    }
}
