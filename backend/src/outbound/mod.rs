//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: process-local store used when no database is configured and
//!   by the HTTP integration tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters translate between domain types and storage representations.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
