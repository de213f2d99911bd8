//! Event, application and lottery endpoints.

use crate::error::AppResult;
use crate::models::{Application, Event, EventSummary, LotteryResults, NewEvent};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Application form body. Fields are optional so that absent values reach
/// validation and are reported by name.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LotteryResponse {
    pub message: String,
    pub total: usize,
    pub winners: usize,
    pub losers: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<EventSummary>>> {
    let events = state.event_service.list_events().await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<NewEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = state.event_service.create_event(&request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<EventSummary>> {
    let event = state.event_service.get_event(event_id).await?;
    Ok(Json(event))
}

pub async fn submit_application(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> AppResult<(StatusCode, Json<ApplyResponse>)> {
    let application = state
        .application_service
        .submit_application(
            event_id,
            request.name.as_deref().unwrap_or_default(),
            request.email.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            id: application.id,
            message: "Application received".to_string(),
        }),
    ))
}

pub async fn list_applications(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<ApplicationsQuery>,
) -> AppResult<Json<Vec<Application>>> {
    let applications = state
        .application_service
        .list_applications(event_id, query.name.as_deref())
        .await?;
    Ok(Json(applications))
}

/// Trigger the lottery. Failures propagate as errors; there is no
/// "completed" response without a committed draw.
pub async fn execute_lottery(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<LotteryResponse>> {
    let outcome = state.lottery_service.execute_lottery(event_id).await?;

    Ok(Json(LotteryResponse {
        message: "Lottery completed".to_string(),
        total: outcome.total,
        winners: outcome.winners,
        losers: outcome.losers,
    }))
}

pub async fn get_results(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<LotteryResults>> {
    let results = state.event_service.get_results(event_id).await?;
    Ok(Json(results))
}
