use crate::error::Error;
use crate::ledger::BookingDraft;
use crate::slots::SlotDraft;
use crate::store::RecordStore;
use crate::types::{AvailabilitySlot, Booking, BookingMode, OwnerSummary, User};
use crate::users::ProfileUpdate;
use crate::AppState;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

/// Verified caller identity, attached by the auth collaborator out-of-band.
/// The service trusts the subject id unconditionally once it arrives.
#[derive(Debug, Clone)]
struct AuthSubject {
    id: String,
    email: String,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateSlotRequest {
    #[validate(range(max = 6))]
    weekday: u8,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    label: String,
    booking_mode: BookingMode,
    #[validate(range(min = 1))]
    max_bookings: u32,
}

impl From<CreateSlotRequest> for SlotDraft {
    fn from(request: CreateSlotRequest) -> Self {
        SlotDraft {
            weekday: request.weekday,
            start_time: request.start_time,
            end_time: request.end_time,
            label: request.label,
            booking_mode: request.booking_mode,
            max_bookings: request.max_bookings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    slot_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeleteRequest {
    id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PublicCalendarResponse {
    owner: OwnerSummary,
    slots: Vec<AvailabilitySlot>,
}

pub fn router<S: RecordStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new().route("/availability/public/:slug", get(get_public_calendar));

    let authenticated = Router::new()
        .route("/user/me", get(get_me).put(update_me))
        .route(
            "/availability",
            get(get_my_slots)
                .post(create_slot)
                .put(update_slot)
                .delete(delete_slot),
        )
        .route("/availability/bulk", post(create_slots_bulk))
        .route(
            "/booking",
            get(get_my_bookings).post(create_booking).delete(delete_booking),
        )
        .route_layer(middleware::from_fn(subject_auth));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .with_state(state)
        .layer(cors)
}

pub async fn start_server<S: RecordStore>(state: AppState<S>, listener: TcpListener) {
    axum::serve(listener, router(state)).await.unwrap();
}

fn header_string(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn subject_auth(mut request: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    let subject_id = header_string(request.headers(), "x-subject-id");
    if subject_id.is_empty() {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    }

    let subject = AuthSubject {
        id: subject_id,
        email: header_string(request.headers(), "x-subject-email"),
        name: header_string(request.headers(), "x-subject-name"),
    };
    request.extensions_mut().insert(subject);
    Ok(next.run(request).await)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Rejected(_) => StatusCode::CONFLICT,
            Error::SlotNotFound | Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        if let Error::Storage(store_error) = &self {
            tracing::error!(%store_error, "record store failure");
        }
        let body = Json(json!({
            "reason": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

async fn get_me<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
) -> Result<Json<User>, Error> {
    let user = state
        .users
        .find_or_create(&subject.id, &subject.email, &subject.name)?;
    Ok(Json(user))
}

async fn update_me<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, Error> {
    // Lazy creation applies here too: a fresh account may set its profile
    // before ever calling GET /user/me.
    state
        .users
        .find_or_create(&subject.id, &subject.email, &subject.name)?;
    let user = state.users.update(&subject.id, update)?;
    Ok(Json(user))
}

async fn get_public_calendar<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Json<PublicCalendarResponse>, Error> {
    let (owner, slots) = state.slots.public(&slug)?;
    Ok(Json(PublicCalendarResponse { owner, slots }))
}

async fn get_my_slots<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
) -> Result<Json<Vec<AvailabilitySlot>>, Error> {
    Ok(Json(state.slots.mine(&subject.id)?))
}

async fn create_slot<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<AvailabilitySlot>), Error> {
    request
        .validate()
        .map_err(|errors| Error::Validation(errors.to_string()))?;
    let slot = state.slots.create(&subject.id, request.into())?;
    Ok((StatusCode::CREATED, Json(slot)))
}

async fn create_slots_bulk<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(requests): Json<Vec<CreateSlotRequest>>,
) -> Result<(StatusCode, Json<Vec<AvailabilitySlot>>), Error> {
    for request in &requests {
        request
            .validate()
            .map_err(|errors| Error::Validation(errors.to_string()))?;
    }
    let drafts = requests.into_iter().map(SlotDraft::from).collect();
    let slots = state.slots.create_bulk(&subject.id, drafts)?;
    Ok((StatusCode::CREATED, Json(slots)))
}

async fn update_slot<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(slot): Json<AvailabilitySlot>,
) -> Result<Json<AvailabilitySlot>, Error> {
    Ok(Json(state.slots.update(&subject.id, slot)?))
}

async fn delete_slot<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, Error> {
    state.slots.delete(&subject.id, request.id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_my_bookings<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
) -> Result<Json<Vec<Booking>>, Error> {
    Ok(Json(state.bookings.list_for_requester(&subject.id)?))
}

async fn create_booking<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), Error> {
    let draft = BookingDraft {
        slot_id: request.slot_id,
        start_time: request.start_time,
        end_time: request.end_time,
        note: request.note,
    };
    let booking = state.bookings.create(&subject.id, draft)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn delete_booking<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(subject): Extension<AuthSubject>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, Error> {
    state.bookings.delete(&subject.id, request.id)?;
    Ok(StatusCode::NO_CONTENT)
}
