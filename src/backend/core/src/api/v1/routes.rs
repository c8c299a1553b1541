//! V1 API routes.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, AppState};

/// V1 API prefix.
pub const V1_PREFIX: &str = "/api/v1";

/// Build the V1 API router.
///
/// All routes are mounted under `/api/v1/`.
///
/// # Endpoints
///
/// ## Admin
/// - `POST /api/v1/init` - Wipe everything and load demo data
///
/// ## Catalog
/// - `GET /api/v1/inks` - List ink models
/// - `GET /api/v1/inks/:code` - Get ink model
/// - `GET /api/v1/printers` - List printers
/// - `GET /api/v1/printers/:id` - Get printer
///
/// ## Units
/// - `GET /api/v1/units?status=IN_STOCK,INSTALLED` - List units (active by default)
/// - `POST /api/v1/units` - Register a unit
/// - `GET /api/v1/units/:id` - Get unit
/// - `PUT /api/v1/units/:id` - Partial update
/// - `DELETE /api/v1/units/:id` - Delete unit and its history
/// - `GET /api/v1/units/:id/events` - Unit history, oldest first
///
/// ## Events
/// - `GET /api/v1/events` - All events, newest first
/// - `POST /api/v1/events` - Record an event and apply it to the unit
/// - `DELETE /api/v1/events/:id` - Delete one event
///
/// ## Dashboard
/// - `GET /api/v1/dashboard` - Per-unit statistics for active units
pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/init", post(handlers::init_demo_data))
        // Catalog
        .route("/inks", get(handlers::list_inks))
        .route("/inks/:code", get(handlers::get_ink))
        .route("/printers", get(handlers::list_printers))
        .route("/printers/:id", get(handlers::get_printer))
        // Units
        .route("/units", get(handlers::list_units).post(handlers::create_unit))
        .route(
            "/units/:id",
            get(handlers::get_unit)
                .put(handlers::update_unit)
                .delete(handlers::delete_unit),
        )
        .route("/units/:id/events", get(handlers::unit_events))
        // Events
        .route("/events", get(handlers::list_events).post(handlers::record_event))
        .route("/events/:id", axum::routing::delete(handlers::delete_event))
        // Dashboard
        .route("/dashboard", get(handlers::dashboard))
}
