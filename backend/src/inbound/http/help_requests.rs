//! Help request and assignment HTTP handlers.
//!
//! ```text
//! POST   /api/v1/help-requests
//! GET    /api/v1/help-requests/{id}
//! PATCH  /api/v1/help-requests/{id}
//! GET    /api/v1/help-requests/{id}/assignments
//! POST   /api/v1/help-requests/{id}/assignments
//! DELETE /api/v1/assignments/{id}
//! GET    /api/v1/me/help-requests
//! GET    /api/v1/me/offers
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Assignment, AssignmentId, AssignmentState, Error, HelpRequest, HelpRequestChanges,
    HelpRequestId, HelpRequestKind, NewAssignment, NewHelpRequest, TownId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, required};

/// Request payload for posting a need or an offer.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHelpRequestBody {
    /// `necesita` or `ofrece`.
    #[serde(rename = "type")]
    #[schema(example = "necesita")]
    pub kind: Option<String>,
    pub town_id: Option<i64>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Option<Vec<String>>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

/// Partial update. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditHelpRequestBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub town_id: Option<i64>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Option<Vec<String>>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

/// Optional contact details shared with the request owner on assignment.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub town_id: Option<i64>,
    pub location: String,
    pub contact_info: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub help_types: Vec<String>,
    pub people_count: Option<u32>,
    pub urgency: Option<String>,
    pub status: String,
    /// Number of users currently assigned.
    pub asignees_count: u32,
    /// `open` or `assigned`, derived from `asigneesCount`.
    pub assignment_state: String,
    pub created_at: String,
}

impl From<HelpRequest> for HelpRequestResponse {
    fn from(value: HelpRequest) -> Self {
        let assignment_state = match value.assignment_state() {
            AssignmentState::Open => "open",
            AssignmentState::Assigned => "assigned",
        };
        Self {
            id: value.id.get(),
            kind: value.kind.as_str().to_owned(),
            user_id: value.user_id.to_string(),
            town_id: value.town_id.map(TownId::get),
            location: value.location,
            contact_info: value.contact_info,
            name: value.name,
            description: value.description,
            help_types: value.help_types,
            people_count: value.people_count,
            urgency: value.urgency,
            status: value.status,
            asignees_count: value.asignees_count,
            assignment_state: assignment_state.to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: i64,
    pub help_request_id: i64,
    pub user_id: String,
    pub phone_number: Option<String>,
    pub created_at: String,
}

impl From<Assignment> for AssignmentResponse {
    fn from(value: Assignment) -> Self {
        Self {
            id: value.id.get(),
            help_request_id: value.help_request_id.get(),
            user_id: value.user_id.to_string(),
            phone_number: value.phone_number,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

fn parse_create_body(body: CreateHelpRequestBody, owner: UserId) -> Result<NewHelpRequest, Error> {
    let kind = required(parse_optional::<HelpRequestKind>(body.kind, "type")?, "type")?;
    let location = required(body.location, "location")?;
    let contact_info = required(body.contact_info, "contactInfo")?;

    let mut request = NewHelpRequest::new(kind, owner, location, contact_info);
    request.town_id = body.town_id.map(TownId::new);
    request.name = body.name;
    request.description = body.description;
    request.help_types = body.help_types.unwrap_or_default();
    request.people_count = body.people_count;
    request.urgency = body.urgency;
    request.status = body.status;
    Ok(request)
}

fn parse_edit_body(body: EditHelpRequestBody) -> Result<HelpRequestChanges, Error> {
    Ok(HelpRequestChanges {
        kind: parse_optional::<HelpRequestKind>(body.kind, "type")?,
        town_id: body.town_id.map(TownId::new),
        location: body.location,
        contact_info: body.contact_info,
        name: body.name,
        description: body.description,
        help_types: body.help_types,
        people_count: body.people_count,
        urgency: body.urgency,
        status: body.status,
    })
}

fn to_responses(requests: Vec<HelpRequest>) -> Vec<HelpRequestResponse> {
    requests.into_iter().map(HelpRequestResponse::from).collect()
}

/// Post a need or an offer owned by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/help-requests",
    request_body = CreateHelpRequestBody,
    responses(
        (status = 201, description = "Created help request", body = HelpRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["help-requests"],
    operation_id = "createHelpRequest"
)]
#[post("/help-requests")]
pub async fn create_help_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateHelpRequestBody>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let request = parse_create_body(payload.into_inner(), owner)?;
    let created = state.help_requests.create_request(request).await?;
    Ok(HttpResponse::Created().json(HelpRequestResponse::from(created)))
}

/// Fetch one help request.
#[utoipa::path(
    get,
    path = "/api/v1/help-requests/{id}",
    params(("id" = i64, Path, description = "Help request id")),
    responses(
        (status = 200, description = "Help request", body = HelpRequestResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["help-requests"],
    operation_id = "getHelpRequest"
)]
#[get("/help-requests/{id}")]
pub async fn get_help_request(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<HelpRequestResponse>> {
    let id = HelpRequestId::new(path.into_inner());
    let request = state.help_requests_query.get_one(id).await?;
    Ok(web::Json(HelpRequestResponse::from(request)))
}

/// Edit a help request. Only its owner may do so.
#[utoipa::path(
    patch,
    path = "/api/v1/help-requests/{id}",
    params(("id" = i64, Path, description = "Help request id")),
    request_body = EditHelpRequestBody,
    responses(
        (status = 200, description = "Updated help request", body = HelpRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["help-requests"],
    operation_id = "editHelpRequest"
)]
#[patch("/help-requests/{id}")]
pub async fn edit_help_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<EditHelpRequestBody>,
) -> ApiResult<web::Json<HelpRequestResponse>> {
    let caller = session.require_user_id()?;
    let id = HelpRequestId::new(path.into_inner());
    let changes = parse_edit_body(payload.into_inner())?;

    let current = state.help_requests_query.get_one(id).await?;
    if !current.is_owned_by(&caller) {
        info!(help_request_id = %id, user_id = %caller, "edit rejected for non-owner");
        return Err(Error::forbidden("only the owner may edit this help request"));
    }

    let updated = state.help_requests.edit_request(id, changes).await?;
    Ok(web::Json(HelpRequestResponse::from(updated)))
}

/// List the users assigned to a help request.
#[utoipa::path(
    get,
    path = "/api/v1/help-requests/{id}/assignments",
    params(("id" = i64, Path, description = "Help request id")),
    responses(
        (status = 200, description = "Assignments", body = [AssignmentResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "listAssignments"
)]
#[get("/help-requests/{id}/assignments")]
pub async fn list_assignments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<AssignmentResponse>>> {
    let id = HelpRequestId::new(path.into_inner());
    let assignments = state.help_requests_query.assignments(id).await?;
    Ok(web::Json(
        assignments.into_iter().map(AssignmentResponse::from).collect(),
    ))
}

/// Assign the session user to a help request.
#[utoipa::path(
    post,
    path = "/api/v1/help-requests/{id}/assignments",
    params(("id" = i64, Path, description = "Help request id")),
    request_body = AssignBody,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Help request not found", body = ErrorSchema),
        (status = 409, description = "Already assigned", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "assignHelpRequest"
)]
#[post("/help-requests/{id}/assignments")]
pub async fn assign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: Option<web::Json<AssignBody>>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = HelpRequestId::new(path.into_inner());
    let phone_number = payload.and_then(|body| body.into_inner().phone_number);

    let assignment = state
        .help_requests
        .assign(NewAssignment::new(id, user_id, phone_number))
        .await?;
    Ok(HttpResponse::Created().json(AssignmentResponse::from(assignment)))
}

/// Remove an assignment.
#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "unassign"
)]
#[delete("/assignments/{id}")]
pub async fn unassign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = AssignmentId::new(path.into_inner());
    state.help_requests.unassign(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Needs posted by the session user plus needs they are assigned to.
#[utoipa::path(
    get,
    path = "/api/v1/me/help-requests",
    description = "Returns an empty list when no session is present.",
    responses(
        (status = 200, description = "Help requests", body = [HelpRequestResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["help-requests"],
    operation_id = "listMyHelpRequests"
)]
#[get("/me/help-requests")]
pub async fn my_help_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<HelpRequestResponse>>> {
    let user_id = session.user_id()?;
    let requests = state.help_requests_query.requests_by_user(user_id).await?;
    Ok(web::Json(to_responses(requests)))
}

/// Offers posted by the session user.
#[utoipa::path(
    get,
    path = "/api/v1/me/offers",
    description = "Returns an empty list when no session is present.",
    responses(
        (status = 200, description = "Offers", body = [HelpRequestResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["help-requests"],
    operation_id = "listMyOffers"
)]
#[get("/me/offers")]
pub async fn my_offers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<HelpRequestResponse>>> {
    let user_id = session.user_id()?;
    let offers = state.help_requests_query.offers_by_user(user_id).await?;
    Ok(web::Json(to_responses(offers)))
}

#[cfg(test)]
#[path = "help_requests_tests.rs"]
mod tests;
