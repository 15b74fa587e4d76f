//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed help request, assignment, town and delivery
//! point entities plus the services that keep them consistent. The domain
//! layer is transport agnostic; inbound adapters translate its [`Error`] into
//! protocol responses.
//!
//! Public surface:
//! - [`Error`], [`ErrorCode`] and [`TraceId`] for failures and correlation.
//! - [`HelpRequest`], [`Assignment`], [`Town`], [`TownSummary`] and
//!   [`DeliveryPoint`] with their input types.
//! - [`HelpRequestLedger`], [`TownDirectory`] and [`DeliveryPointRegistry`]
//!   implementing the driving ports in [`ports`].

pub mod assignment;
pub mod delivery_point;
pub mod delivery_point_registry;
pub mod error;
pub mod help_request;
pub mod ids;
pub mod ledger;
pub mod ports;
pub mod town;
pub mod town_directory;
pub mod trace_id;
pub mod user;

pub use self::assignment::{Assignment, NewAssignment};
pub use self::delivery_point::{
    CargoType, Coordinates, DeliveryPoint, DeliveryPointDraft, DeliveryPointStatus,
    DeliveryPointValidationError, NewDeliveryPoint, UnknownVariant, VehicleType,
};
pub use self::delivery_point_registry::DeliveryPointRegistry;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::help_request::{
    AssignmentState, DEFAULT_STATUS, HelpRequest, HelpRequestChanges, HelpRequestKind,
    HelpRequestValidationError, NewHelpRequest, UnknownHelpRequestKind,
};
pub use self::ids::{AssignmentId, DeliveryPointId, HelpRequestId, TownId};
pub use self::ledger::HelpRequestLedger;
pub use self::town::{Town, TownName, TownSummary, TownValidationError};
pub use self::town_directory::TownDirectory;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};
