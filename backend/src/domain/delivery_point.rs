//! Logistics delivery points.
//!
//! Delivery points are registered by volunteers coordinating drop-offs. They
//! are independent of the ledger; the registry validates input and the store
//! keeps the rows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeliveryPointId;

macro_rules! wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire and storage representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Human-readable label.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Raised when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

wire_enum! {
    /// Largest vehicle the point can receive.
    pub enum VehicleType {
        LargeTruck => ("camion_grande", "Camión grande (>3500kg)"),
        MediumTruck => ("camion_mediano", "Camión mediano"),
        LargeVan => ("furgoneta_grande", "Furgoneta grande"),
        MediumVan => ("furgoneta_mediana", "Furgoneta mediana"),
        Other => ("otro", "Otro"),
    }
}

wire_enum! {
    /// Kind of goods handled at the point.
    pub enum CargoType {
        Food => ("alimentos", "Alimentos"),
        Clothing => ("ropa", "Ropa"),
        CleaningProducts => ("productos_limpieza", "Productos de limpieza"),
        ConstructionMaterial => ("material_construccion", "Material de construcción"),
        Furniture => ("mobiliario", "Mobiliario"),
        Miscellaneous => ("varios", "Varios"),
    }
}

wire_enum! {
    /// Whether the point currently accepts deliveries.
    pub enum DeliveryPointStatus {
        Active => ("active", "Activo"),
        Inactive => ("inactive", "Inactivo"),
    }
}

/// Validation failures for delivery point input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryPointValidationError {
    /// A required text field was blank.
    #[error("{field} must not be blank")]
    MissingField { field: &'static str },
    /// Only one of latitude or longitude was supplied.
    #[error("latitude and longitude must be provided together")]
    PartialCoordinates,
    /// Latitude outside [-90, 90].
    #[error("latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180].
    #[error("longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

impl DeliveryPointValidationError {
    /// Wire name of the offending field.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => *field,
            Self::PartialCoordinates | Self::LatitudeOutOfRange => "latitude",
            Self::LongitudeOutOfRange => "longitude",
        }
    }
}

/// Validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate a latitude/longitude pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DeliveryPointValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DeliveryPointValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DeliveryPointValidationError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from optional parts; both or neither must be present.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, DeliveryPointValidationError> {
        match (latitude, longitude) {
            (None, None) => Ok(None),
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            _ => Err(DeliveryPointValidationError::PartialCoordinates),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Persisted delivery point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPoint {
    pub id: DeliveryPointId,
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub cargo_type: Option<CargoType>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: DeliveryPointStatus,
    pub created_at: DateTime<Utc>,
}

/// Raw registration input as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryPointDraft {
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub cargo_type: Option<CargoType>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validated registration ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeliveryPoint {
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub cargo_type: Option<CargoType>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: DeliveryPointStatus,
}

fn required(value: String, field: &'static str) -> Result<String, DeliveryPointValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeliveryPointValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl TryFrom<DeliveryPointDraft> for NewDeliveryPoint {
    type Error = DeliveryPointValidationError;

    fn try_from(draft: DeliveryPointDraft) -> Result<Self, Self::Error> {
        let DeliveryPointDraft {
            name,
            location,
            city,
            contact_name,
            contact_phone,
            contact_email,
            vehicle_type,
            cargo_type,
            schedule,
            additional_info,
            latitude,
            longitude,
        } = draft;

        Ok(Self {
            name: required(name, "name")?,
            location: required(location, "location")?,
            contact_phone: required(contact_phone, "contactPhone")?,
            coordinates: Coordinates::from_parts(latitude, longitude)?,
            city: optional(city),
            contact_name: optional(contact_name),
            contact_email: optional(contact_email),
            vehicle_type,
            cargo_type,
            schedule: optional(schedule),
            additional_info: optional(additional_info),
            status: DeliveryPointStatus::Active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> DeliveryPointDraft {
        DeliveryPointDraft {
            name: "Polideportivo".to_owned(),
            location: "Av. del Sur 12".to_owned(),
            contact_phone: "699 111 222".to_owned(),
            ..DeliveryPointDraft::default()
        }
    }

    #[rstest]
    fn blank_optionals_become_none(mut draft: DeliveryPointDraft) {
        draft.city = Some("   ".to_owned());
        draft.schedule = Some(" 9-14h ".to_owned());

        let point = NewDeliveryPoint::try_from(draft).expect("valid draft");

        assert!(point.city.is_none());
        assert_eq!(point.schedule.as_deref(), Some("9-14h"));
        assert_eq!(point.status, DeliveryPointStatus::Active);
    }

    #[rstest]
    #[case("name")]
    #[case("location")]
    #[case("contactPhone")]
    fn missing_required_field_is_rejected(
        mut draft: DeliveryPointDraft,
        #[case] field: &'static str,
    ) {
        match field {
            "name" => draft.name = " ".to_owned(),
            "location" => draft.location.clear(),
            _ => draft.contact_phone.clear(),
        }
        let err = NewDeliveryPoint::try_from(draft).expect_err("missing field");
        assert_eq!(err, DeliveryPointValidationError::MissingField { field });
        assert_eq!(err.field(), field);
    }

    #[rstest]
    #[case(Some(39.4), None, DeliveryPointValidationError::PartialCoordinates)]
    #[case(Some(91.0), Some(0.0), DeliveryPointValidationError::LatitudeOutOfRange)]
    #[case(Some(39.4), Some(-181.0), DeliveryPointValidationError::LongitudeOutOfRange)]
    fn bad_coordinates_are_rejected(
        mut draft: DeliveryPointDraft,
        #[case] latitude: Option<f64>,
        #[case] longitude: Option<f64>,
        #[case] expected: DeliveryPointValidationError,
    ) {
        draft.latitude = latitude;
        draft.longitude = longitude;
        assert_eq!(NewDeliveryPoint::try_from(draft), Err(expected));
    }

    #[rstest]
    fn vehicle_types_round_trip_through_wire_names() {
        for vehicle in VehicleType::ALL {
            assert_eq!(vehicle.as_str().parse::<VehicleType>(), Ok(*vehicle));
        }
        assert_eq!(VehicleType::LargeTruck.label(), "Camión grande (>3500kg)");
        assert!("bicicleta".parse::<VehicleType>().is_err());
    }
}
