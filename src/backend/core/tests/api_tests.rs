//! HTTP tests for the v1 API.
//!
//! Requests are driven straight through the axum `Router` with
//! `tower::ServiceExt::oneshot`; no socket is opened.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use inkledger_core::api::{build_router, ApiResponse, AppState};
use inkledger_core::seed::SeedData;
use inkledger_core::service::InventoryService;
use inkledger_core::store::InMemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

// ============================================================================
// Test Utilities
// ============================================================================

fn app() -> Router {
    let store = Arc::new(InMemoryStore::with_seed(&SeedData::demo()));
    build_router(AppState::new(InventoryService::new(store)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// ============================================================================
// ApiResponse
// ============================================================================

#[test]
fn test_api_response_serialization() {
    let response = ApiResponse::success(json!({"unit_id": "HP80A-STOCK-001"}));
    let parsed = serde_json::to_value(&response).unwrap();

    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["data"]["unit_id"], "HP80A-STOCK-001");
    assert!(parsed.get("error").is_none());
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

// ============================================================================
// Units
// ============================================================================

#[tokio::test]
async fn test_list_units_defaults_to_active() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/units", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_list_units_by_status() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/units?status=INSTALLED", None).await;

    assert_eq!(status, StatusCode::OK);
    let units = body["data"].as_array().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["current_printer_id"], "VP-HANOI-01");

    let (status, body) = send(&app, Method::GET, "/api/v1/units?status=BROKEN", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["details"]["context"]["status"].is_array());
}

#[tokio::test]
async fn test_create_unit_and_duplicate() {
    let app = app();
    let body = json!({"unit_id": "C746-STOCK-002", "ink_code": "INK-C746"});

    let (status, created) = send(&app, Method::POST, "/api/v1/units", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "IN_STOCK");

    let (status, err) = send(&app, Method::POST, "/api/v1/units", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["success"], false);
}

#[tokio::test]
async fn test_create_unit_missing_field() {
    let (status, err) = send(
        &app(),
        Method::POST,
        "/api/v1/units",
        Some(json!({"ink_code": "INK-C746"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["success"], false);
}

#[tokio::test]
async fn test_malformed_body_is_unprocessable() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/events")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_unit_clears_custom_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/units/HP80A-STOCK-001",
        Some(json!({"custom_name": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["custom_name"].is_null());
}

#[tokio::test]
async fn test_get_missing_unit() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/units/NOPE", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_delete_unit_cascades() {
    let app = app();
    let event = json!({
        "unit_id": "HP80A-INSTALLED-001",
        "printer_id": "VP-HANOI-01",
        "event_kind": "REFILL"
    });
    send(&app, Method::POST, "/api/v1/events", Some(event)).await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/units/HP80A-INSTALLED-001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["events_removed"], 1);

    let (status, body) = send(&app, Method::GET, "/api/v1/units/HP80A-INSTALLED-001/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_record_install_event() {
    let app = app();
    let event = json!({
        "unit_id": "HP80A-STOCK-002",
        "printer_id": "VP-HCM-03",
        "event_kind": "INSTALL",
        "detail": "front office"
    });

    let (status, body) = send(&app, Method::POST, "/api/v1/events", Some(event)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["unit"]["status"], "INSTALLED");
    assert_eq!(body["data"]["unit"]["current_printer_id"], "VP-HCM-03");
    assert_eq!(body["data"]["event"]["event_kind"], "INSTALL");

    let (_, listed) = send(&app, Method::GET, "/api/v1/events", None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_event_unknown_unit() {
    let event = json!({
        "unit_id": "GHOST-001",
        "printer_id": "VP-HCM-03",
        "event_kind": "REFILL"
    });
    let (status, _) = send(&app(), Method::POST, "/api/v1/events", Some(event)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_event_bad_and_unknown_id() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/api/v1/events/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_FORMAT");
    assert_eq!(body["retryable"], false);

    let uri = format!("/api/v1/events/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Catalog, dashboard, seeding
// ============================================================================

#[tokio::test]
async fn test_catalog_lookups() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/inks/TNR-HP80A", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ink_type"], "Toner");

    let (status, _) = send(&app, Method::GET, "/api/v1/printers/VP-NOWHERE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_placeholders() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row["avg_refill_cycle"], "N/A");
        assert_eq!(row["latest_refill_date"], "N/A");
        assert_eq!(row["total_refill_count"], 0);
    }
}

#[tokio::test]
async fn test_init_resets_data() {
    let app = app();
    send(&app, Method::DELETE, "/api/v1/units/HP80A-STOCK-001", None).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/init", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["units"], 4);

    let (status, _) = send(&app, Method::GET, "/api/v1/units/HP80A-STOCK-001", None).await;
    assert_eq!(status, StatusCode::OK);
}
