//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL through
//! `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map onto each port's
//!   error enum; unique and foreign key violations get dedicated variants.
//!
//! # Example
//!
//! ```ignore
//! use ayuda::outbound::persistence::{DbPool, DieselHelpRequestRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ayuda")).await?;
//! let repo = DieselHelpRequestRepository::new(pool);
//! ```

mod diesel_assignment_repository;
mod diesel_delivery_point_repository;
mod diesel_help_request_repository;
mod diesel_town_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_delivery_point_repository::DieselDeliveryPointRepository;
pub use diesel_help_request_repository::DieselHelpRequestRepository;
pub use diesel_town_repository::DieselTownRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
