//! V1 API module: catalog, units, events and the dashboard.

pub mod routes;

pub use routes::{v1_router, V1_PREFIX};
