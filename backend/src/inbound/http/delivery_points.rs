//! Delivery point HTTP handlers.
//!
//! ```text
//! GET  /api/v1/delivery-points
//! POST /api/v1/delivery-points
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CargoType, DeliveryPoint, DeliveryPointDraft, Error, VehicleType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_optional;

/// Registration payload. `name`, `location` and `contactPhone` are required;
/// coordinates must be given together.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeliveryPointBody {
    pub name: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// One of `camion_grande`, `camion_mediano`, `furgoneta_grande`,
    /// `furgoneta_mediana`, `otro`.
    #[schema(example = "furgoneta_grande")]
    pub vehicle_type: Option<String>,
    /// One of `alimentos`, `ropa`, `productos_limpieza`,
    /// `material_construccion`, `mobiliario`, `varios`.
    #[schema(example = "alimentos")]
    pub cargo_type: Option<String>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPointResponse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_type_label: Option<String>,
    pub cargo_type: Option<String>,
    pub cargo_type_label: Option<String>,
    pub schedule: Option<String>,
    pub additional_info: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub created_at: String,
}

impl From<DeliveryPoint> for DeliveryPointResponse {
    fn from(value: DeliveryPoint) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            location: value.location,
            city: value.city,
            contact_name: value.contact_name,
            contact_phone: value.contact_phone,
            contact_email: value.contact_email,
            vehicle_type: value.vehicle_type.map(|v| v.as_str().to_owned()),
            vehicle_type_label: value.vehicle_type.map(|v| v.label().to_owned()),
            cargo_type: value.cargo_type.map(|c| c.as_str().to_owned()),
            cargo_type_label: value.cargo_type.map(|c| c.label().to_owned()),
            schedule: value.schedule,
            additional_info: value.additional_info,
            latitude: value.coordinates.map(|c| c.latitude()),
            longitude: value.coordinates.map(|c| c.longitude()),
            status: value.status.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Missing required strings become empty so the registry reports them with
/// the same `missing_field` detail as blank ones.
fn parse_register_body(body: RegisterDeliveryPointBody) -> Result<DeliveryPointDraft, Error> {
    Ok(DeliveryPointDraft {
        name: body.name.unwrap_or_default(),
        location: body.location.unwrap_or_default(),
        city: body.city,
        contact_name: body.contact_name,
        contact_phone: body.contact_phone.unwrap_or_default(),
        contact_email: body.contact_email,
        vehicle_type: parse_optional::<VehicleType>(body.vehicle_type, "vehicleType")?,
        cargo_type: parse_optional::<CargoType>(body.cargo_type, "cargoType")?,
        schedule: body.schedule,
        additional_info: body.additional_info,
        latitude: body.latitude,
        longitude: body.longitude,
    })
}

/// List delivery points, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/delivery-points",
    responses(
        (status = 200, description = "Delivery points", body = [DeliveryPointResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["delivery-points"],
    operation_id = "listDeliveryPoints"
)]
#[get("/delivery-points")]
pub async fn list_delivery_points(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DeliveryPointResponse>>> {
    let points = state.delivery_points_query.list().await?;
    Ok(web::Json(
        points.into_iter().map(DeliveryPointResponse::from).collect(),
    ))
}

/// Register a delivery point.
#[utoipa::path(
    post,
    path = "/api/v1/delivery-points",
    request_body = RegisterDeliveryPointBody,
    responses(
        (status = 201, description = "Registered delivery point", body = DeliveryPointResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["delivery-points"],
    operation_id = "registerDeliveryPoint"
)]
#[post("/delivery-points")]
pub async fn register_delivery_point(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterDeliveryPointBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_register_body(payload.into_inner())?;
    let point = state.delivery_points.register(draft).await?;
    Ok(HttpResponse::Created().json(DeliveryPointResponse::from(point)))
}
