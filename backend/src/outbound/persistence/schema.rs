//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here; `diesel
//! print-schema` against a migrated database produces the same output.

diesel::table! {
    /// Towns that group help requests.
    towns (id) {
        id -> Int8,
        /// Unique, non-blank display name.
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posted needs (`necesita`) and offers (`ofrece`).
    help_requests (id) {
        id -> Int8,
        #[sql_name = "type"]
        request_type -> Text,
        user_id -> Uuid,
        town_id -> Nullable<Int8>,
        location -> Text,
        contact_info -> Text,
        name -> Nullable<Text>,
        description -> Nullable<Text>,
        help_type -> Array<Text>,
        number_of_people -> Nullable<Int4>,
        urgency -> Nullable<Text>,
        status -> Text,
        /// Number of assignment rows referencing the request.
        asignees_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users who claimed a help request. Unique per (request, user).
    help_request_assignments (id) {
        id -> Int8,
        help_request_id -> Int8,
        user_id -> Uuid,
        phone_number -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Logistics drop-off and pickup locations.
    delivery_points (id) {
        id -> Int8,
        name -> Text,
        location -> Text,
        city -> Nullable<Text>,
        contact_name -> Nullable<Text>,
        contact_phone -> Text,
        contact_email -> Nullable<Text>,
        vehicle_type -> Nullable<Text>,
        cargo_type -> Nullable<Text>,
        schedule -> Nullable<Text>,
        additional_info -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only view with per-town counters over the last 24 hours.
    town_help_request_summary (town_id) {
        town_id -> Int8,
        town_name -> Text,
        offers_last_24h -> Int4,
        needs_last_24h -> Int4,
        unassigned_needs -> Int4,
    }
}

diesel::joinable!(help_request_assignments -> help_requests (help_request_id));
diesel::joinable!(help_requests -> towns (town_id));

diesel::allow_tables_to_appear_in_same_query!(
    towns,
    help_requests,
    help_request_assignments,
    delivery_points,
    town_help_request_summary,
);
