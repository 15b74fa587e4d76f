//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_repository;
mod delivery_point_command;
mod delivery_point_query;
mod delivery_point_repository;
mod help_request_command;
mod help_request_query;
mod help_request_repository;
mod town_command;
mod town_query;
mod town_repository;

#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
pub use assignment_repository::{AssignmentRepository, AssignmentRepositoryError};
#[cfg(test)]
pub use delivery_point_command::MockDeliveryPointCommand;
pub use delivery_point_command::DeliveryPointCommand;
#[cfg(test)]
pub use delivery_point_query::MockDeliveryPointQuery;
pub use delivery_point_query::DeliveryPointQuery;
#[cfg(test)]
pub use delivery_point_repository::MockDeliveryPointRepository;
pub use delivery_point_repository::{DeliveryPointRepository, DeliveryPointRepositoryError};
#[cfg(test)]
pub use help_request_command::MockHelpRequestCommand;
pub use help_request_command::HelpRequestCommand;
#[cfg(test)]
pub use help_request_query::MockHelpRequestQuery;
pub use help_request_query::HelpRequestQuery;
#[cfg(test)]
pub use help_request_repository::MockHelpRequestRepository;
pub use help_request_repository::{HelpRequestRepository, HelpRequestRepositoryError};
#[cfg(test)]
pub use town_command::MockTownCommand;
pub use town_command::TownCommand;
#[cfg(test)]
pub use town_query::MockTownQuery;
pub use town_query::TownQuery;
#[cfg(test)]
pub use town_repository::MockTownRepository;
pub use town_repository::{TownRepository, TownRepositoryError};
