//! Store-assigned numeric identifiers.
//!
//! Rows are keyed by `bigserial` columns; each aggregate gets its own newtype
//! so an assignment id can never be passed where a help request id is
//! expected.

macro_rules! define_numeric_id {
    (
        $(#[$outer:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store identifier.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw store identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_numeric_id! {
    /// Identifier of a help request row.
    pub struct HelpRequestId;
}

define_numeric_id! {
    /// Identifier of an assignment row.
    pub struct AssignmentId;
}

define_numeric_id! {
    /// Identifier of a town row.
    pub struct TownId;
}

define_numeric_id! {
    /// Identifier of a delivery point row.
    pub struct DeliveryPointId;
}
