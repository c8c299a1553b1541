//! API request handlers.
//!
//! All handlers return `Result<impl IntoResponse, InkError>` so that errors
//! are converted to HTTP status codes by `InkError`'s `IntoResponse`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, AppState};
use crate::error::InkError;
use crate::events::{EventId, NewEvent};
use crate::inventory::{CreateUnitRequest, UnitPatch, UnitStatus};

// ═══════════════════════════════════════════════════════════════════════════════
// Health & Metrics
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, code) = match state.service.ping().await {
        Ok(()) => ("healthy", StatusCode::OK),
        Err(err) => {
            err.log();
            ("degraded", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(serde_json::json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "backend": state.service.backend_name(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

pub async fn prometheus_metrics() -> impl IntoResponse {
    let body = crate::telemetry::MetricsRegistry::global().render();

    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Admin
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    pub inks: usize,
    pub printers: usize,
    pub units: usize,
}

pub async fn init_demo_data(State(state): State<AppState>) -> Result<impl IntoResponse, InkError> {
    let seed = state.service.seed_demo().await?;

    Ok(Json(ApiResponse::success(SeedResponse {
        message: "Demo data loaded",
        inks: seed.inks.len(),
        printers: seed.printers.len(),
        units: seed.units.len(),
    })))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_inks(State(state): State<AppState>) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.list_inks().await?)))
}

pub async fn get_ink(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.get_ink(&code).await?)))
}

pub async fn list_printers(State(state): State<AppState>) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.list_printers().await?)))
}

pub async fn get_printer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.get_printer(&id).await?)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Units
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct UnitListQuery {
    /// Comma-separated statuses, e.g. `IN_STOCK,INSTALLED`.
    pub status: Option<String>,
}

pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<UnitListQuery>,
) -> Result<impl IntoResponse, InkError> {
    let statuses = match query.status.as_deref() {
        Some(raw) => UnitStatus::parse_list(raw)?,
        None => Vec::new(),
    };
    Ok(Json(ApiResponse::success(state.service.list_units(&statuses).await?)))
}

pub async fn create_unit(
    State(state): State<AppState>,
    payload: Result<Json<CreateUnitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, InkError> {
    let Json(req) = payload?;
    let unit = state.service.create_unit(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(unit))))
}

pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.get_unit(&id).await?)))
}

pub async fn update_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UnitPatch>, JsonRejection>,
) -> Result<impl IntoResponse, InkError> {
    let Json(patch) = payload?;
    let unit = state.service.update_unit(&id, patch).await?;
    Ok(Json(ApiResponse::success(unit)))
}

#[derive(Serialize)]
pub struct DeleteUnitResponse {
    pub unit_id: String,
    pub events_removed: u64,
}

pub async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    let deleted = state.service.delete_unit(&id).await?;
    Ok(Json(ApiResponse::success(DeleteUnitResponse {
        unit_id: id,
        events_removed: deleted.events_removed,
    })))
}

pub async fn unit_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.unit_history(&id).await?)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn record_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<impl IntoResponse, InkError> {
    let Json(req) = payload?;
    let recorded = state.service.record_event(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(recorded))))
}

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.list_events().await?)))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, InkError> {
    let id: EventId = id.parse()?;
    state.service.delete_event(id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({ "id": id }))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, InkError> {
    Ok(Json(ApiResponse::success(state.service.dashboard().await?)))
}
