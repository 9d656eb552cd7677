use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::{IntervalStream, WatchStream};
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::{ContactField, FlowView, ServiceType};
use crate::services::booking_flow::BookingController;
use crate::state::AppState;

fn find_flow(state: &AppState, id: &str) -> Result<Arc<BookingController>, AppError> {
    state
        .flows
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("flow {id}")))
}

fn view(controller: &BookingController) -> Json<FlowView> {
    Json(FlowView::from(controller.snapshot()))
}

// GET /api/services
pub async fn list_services() -> Json<Vec<&'static str>> {
    Json(ServiceType::ALL.iter().map(|s| s.as_str()).collect())
}

// POST /api/flows
#[derive(Serialize)]
pub struct CreatedFlow {
    pub id: String,
    pub flow: FlowView,
}

pub async fn create_flow(State(state): State<Arc<AppState>>) -> (StatusCode, Json<CreatedFlow>) {
    let controller = Arc::new(BookingController::new(Arc::clone(&state.backend)));
    let flow = FlowView::from(controller.snapshot());
    let id = state.flows.insert(controller);
    tracing::info!(flow_id = %id, "booking flow started");

    (StatusCode::CREATED, Json(CreatedFlow { id, flow }))
}

// GET /api/flows/:id
pub async fn get_flow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    Ok(view(&controller))
}

// DELETE /api/flows/:id
pub async fn delete_flow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.flows.remove(&id) {
        return Err(AppError::NotFound(format!("flow {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/flows/:id/contact
#[derive(Debug, Default, Deserialize)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
}

pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ContactUpdate>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;

    // service first: it is the only field that can be rejected
    let edits = [
        (ContactField::Service, body.service),
        (ContactField::Name, body.name),
        (ContactField::Phone, body.phone),
        (ContactField::Email, body.email),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            controller.update_contact(field, &value)?;
        }
    }

    Ok(view(&controller))
}

// POST /api/flows/:id/info
pub async fn submit_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    controller.submit_info()?;
    Ok(view(&controller))
}

// POST /api/flows/:id/date
#[derive(Debug, Deserialize)]
pub struct DateRequest {
    pub date: NaiveDate,
}

pub async fn select_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<DateRequest>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    controller.select_date(body.date).await?;
    Ok(view(&controller))
}

// POST /api/flows/:id/slot
#[derive(Debug, Deserialize)]
pub struct SlotRequest {
    pub id: String,
}

pub async fn select_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SlotRequest>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    controller.select_slot(&body.id)?;
    Ok(view(&controller))
}

// POST /api/flows/:id/confirm
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    let outcome = controller.confirm().await;
    tracing::debug!(flow_id = %id, ?outcome, "confirm handled");
    Ok(view(&controller))
}

// POST /api/flows/:id/back
pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    controller.go_back()?;
    Ok(view(&controller))
}

// POST /api/flows/:id/reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlowView>, AppError> {
    let controller = find_flow(&state, &id)?;
    controller.reset()?;
    Ok(view(&controller))
}

// GET /api/flows/:id/events (SSE stream of flow snapshots)
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let controller = find_flow(&state, &id)?;

    let snapshots = WatchStream::new(controller.subscribe()).map(|snapshot| {
        let data = serde_json::to_string(&FlowView::from(snapshot)).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(data).event("flow"))
    });

    let keepalive = IntervalStream::new(tokio::time::interval(Duration::from_secs(30)))
        .map(|_| Ok::<_, Infallible>(Event::default().comment("keepalive")));

    Ok(Sse::new(snapshots.merge(keepalive)))
}
