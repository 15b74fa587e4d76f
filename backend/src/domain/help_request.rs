//! Help request aggregate.
//!
//! A help request is either a need (`necesita`) or an offer (`ofrece`). The
//! `asignees_count` field is denormalised: it mirrors the number of
//! assignment rows that reference the request and is only ever changed by the
//! ledger through atomic store-side adjustments.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HelpRequestId, TownId, UserId};

/// Status assigned to new requests when the caller does not provide one.
pub const DEFAULT_STATUS: &str = "active";

/// Whether a request asks for help or offers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpRequestKind {
    /// Someone needs help.
    Necesita,
    /// Someone offers help.
    Ofrece,
}

impl HelpRequestKind {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Necesita => "necesita",
            Self::Ofrece => "ofrece",
        }
    }
}

impl fmt::Display for HelpRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown request kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown help request type: {0}")]
pub struct UnknownHelpRequestKind(pub String);

impl FromStr for HelpRequestKind {
    type Err = UnknownHelpRequestKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "necesita" => Ok(Self::Necesita),
            "ofrece" => Ok(Self::Ofrece),
            other => Err(UnknownHelpRequestKind(other.to_owned())),
        }
    }
}

/// Assignment state derived from the assignee counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Nobody has claimed the request yet.
    Open,
    /// At least one user has claimed the request.
    Assigned,
}

/// Persisted help request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    pub id: HelpRequestId,
    pub kind: HelpRequestKind,
    pub user_id: UserId,
    pub town_id: Option<TownId>,
    pub location: String,
    pub contact_info: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Vec<String>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: String,
    pub asignees_count: u32,
    pub created_at: DateTime<Utc>,
}

impl HelpRequest {
    /// Derive the assignment state from the counter.
    ///
    /// # Examples
    /// ```
    /// use ayuda::domain::{AssignmentState, HelpRequest};
    ///
    /// fn is_open(request: &HelpRequest) -> bool {
    ///     request.assignment_state() == AssignmentState::Open
    /// }
    /// ```
    pub fn assignment_state(&self) -> AssignmentState {
        if self.asignees_count == 0 {
            AssignmentState::Open
        } else {
            AssignmentState::Assigned
        }
    }

    /// Whether `user_id` owns this request.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Validation failures for help request input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HelpRequestValidationError {
    /// Location is required and must not be blank.
    #[error("location must not be blank")]
    BlankLocation,
    /// Contact information is required and must not be blank.
    #[error("contact info must not be blank")]
    BlankContactInfo,
    /// Status, when provided, must not be blank.
    #[error("status must not be blank")]
    BlankStatus,
    /// An edit must change at least one field.
    #[error("at least one field must be provided")]
    EmptyChanges,
}

impl HelpRequestValidationError {
    /// Wire name of the offending field, if any.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::BlankLocation => Some("location"),
            Self::BlankContactInfo => Some("contactInfo"),
            Self::BlankStatus => Some("status"),
            Self::EmptyChanges => None,
        }
    }
}

fn require_text(
    value: &str,
    error: HelpRequestValidationError,
) -> Result<(), HelpRequestValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

/// Input for creating a help request.
///
/// `kind`, `user_id`, `location` and `contact_info` are required; everything
/// else is optional. The counter is not part of the input: new requests
/// always start with zero assignees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHelpRequest {
    pub kind: HelpRequestKind,
    pub user_id: UserId,
    pub town_id: Option<TownId>,
    pub location: String,
    pub contact_info: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Vec<String>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

impl NewHelpRequest {
    /// Minimal request with only the required fields set.
    pub fn new(
        kind: HelpRequestKind,
        user_id: UserId,
        location: impl Into<String>,
        contact_info: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            user_id,
            town_id: None,
            location: location.into(),
            contact_info: contact_info.into(),
            name: None,
            description: None,
            help_types: Vec::new(),
            people_count: None,
            urgency: None,
            status: None,
        }
    }

    /// Check required fields before any store call.
    pub fn validate(&self) -> Result<(), HelpRequestValidationError> {
        require_text(&self.location, HelpRequestValidationError::BlankLocation)?;
        require_text(&self.contact_info, HelpRequestValidationError::BlankContactInfo)?;
        if let Some(status) = &self.status {
            require_text(status, HelpRequestValidationError::BlankStatus)?;
        }
        Ok(())
    }

    /// Status to persist, falling back to [`DEFAULT_STATUS`].
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }
}

/// Partial update applied by `editRequest`.
///
/// Fields left as `None` are untouched. The assignee counter is deliberately
/// absent: only assign/unassign move it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestChanges {
    pub kind: Option<HelpRequestKind>,
    pub town_id: Option<TownId>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Option<Vec<String>>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

impl HelpRequestChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Reject empty edits and blank required fields.
    pub fn validate(&self) -> Result<(), HelpRequestValidationError> {
        if self.is_empty() {
            return Err(HelpRequestValidationError::EmptyChanges);
        }
        if let Some(location) = &self.location {
            require_text(location, HelpRequestValidationError::BlankLocation)?;
        }
        if let Some(contact_info) = &self.contact_info {
            require_text(contact_info, HelpRequestValidationError::BlankContactInfo)?;
        }
        if let Some(status) = &self.status {
            require_text(status, HelpRequestValidationError::BlankStatus)?;
        }
        Ok(())
    }

    /// Apply the changes to an in-memory copy of a request, cloning only the
    /// fields that are set.
    pub fn apply_to(&self, request: &mut HelpRequest) {
        if let Some(kind) = self.kind {
            request.kind = kind;
        }
        if let Some(town_id) = self.town_id {
            request.town_id = Some(town_id);
        }
        if let Some(location) = &self.location {
            request.location.clone_from(location);
        }
        if let Some(contact_info) = &self.contact_info {
            request.contact_info.clone_from(contact_info);
        }
        if let Some(name) = &self.name {
            request.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            request.description = Some(description.clone());
        }
        if let Some(help_types) = &self.help_types {
            request.help_types.clone_from(help_types);
        }
        if let Some(people_count) = self.people_count {
            request.people_count = Some(people_count);
        }
        if let Some(urgency) = &self.urgency {
            request.urgency = Some(urgency.clone());
        }
        if let Some(status) = &self.status {
            request.status.clone_from(status);
        }
    }
}
