//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Conversions into domain types live next to
//! the repositories that use them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    delivery_points, help_request_assignments, help_requests, town_help_request_summary, towns,
};

// ---------------------------------------------------------------------------
// Help request models
// ---------------------------------------------------------------------------

/// Row struct for reading from the help_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = help_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HelpRequestRow {
    pub id: i64,
    pub request_type: String,
    pub user_id: Uuid,
    pub town_id: Option<i64>,
    pub location: String,
    pub contact_info: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_type: Vec<String>,
    pub number_of_people: Option<i32>,
    pub urgency: Option<String>,
    pub status: String,
    pub asignees_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating help requests. The counter and timestamp
/// come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = help_requests)]
pub(crate) struct NewHelpRequestRow<'a> {
    pub request_type: &'a str,
    pub user_id: Uuid,
    pub town_id: Option<i64>,
    pub location: &'a str,
    pub contact_info: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub help_type: &'a [String],
    pub number_of_people: Option<i32>,
    pub urgency: Option<&'a str>,
    pub status: &'a str,
}

/// Changeset for partial edits. `None` fields are left untouched and
/// `asignees_count` is deliberately absent.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = help_requests)]
pub(crate) struct HelpRequestUpdate<'a> {
    pub request_type: Option<&'a str>,
    pub town_id: Option<i64>,
    pub location: Option<&'a str>,
    pub contact_info: Option<&'a str>,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub help_type: Option<&'a [String]>,
    pub number_of_people: Option<i32>,
    pub urgency: Option<&'a str>,
    pub status: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Assignment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the help_request_assignments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = help_request_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssignmentRow {
    pub id: i64,
    pub help_request_id: i64,
    pub user_id: Uuid,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating assignments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = help_request_assignments)]
pub(crate) struct NewAssignmentRow<'a> {
    pub help_request_id: i64,
    pub user_id: Uuid,
    pub phone_number: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Town models
// ---------------------------------------------------------------------------

/// Row struct for reading from the towns table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = towns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TownRow {
    pub id: i64,
    pub name: String,
}

/// Insertable struct for creating towns.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = towns)]
pub(crate) struct NewTownRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the town_help_request_summary view.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = town_help_request_summary)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TownSummaryRow {
    pub town_id: i64,
    pub town_name: String,
    pub offers_last_24h: i32,
    pub needs_last_24h: i32,
    pub unassigned_needs: i32,
}

// ---------------------------------------------------------------------------
// Delivery point models
// ---------------------------------------------------------------------------

/// Row struct for reading from the delivery_points table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = delivery_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliveryPointRow {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub vehicle_type: Option<String>,
    pub cargo_type: Option<String>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering delivery points.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = delivery_points)]
pub(crate) struct NewDeliveryPointRow<'a> {
    pub name: &'a str,
    pub location: &'a str,
    pub city: Option<&'a str>,
    pub contact_name: Option<&'a str>,
    pub contact_phone: &'a str,
    pub contact_email: Option<&'a str>,
    pub vehicle_type: Option<&'a str>,
    pub cargo_type: Option<&'a str>,
    pub schedule: Option<&'a str>,
    pub additional_info: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: &'a str,
}
