use axum::{Router, routing::{get, post, delete}, middleware};
use crate::handler::admin_handler::{
    stats_handler,
    analytics_handler,
    export_csv_handler,
    export_database_handler,
    import_database_handler,
    clear_database_handler,
};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;
use crate::service::access_gate::SharedGate;
use crate::middlewares::admin_middleware::admin_gate;

pub fn admin_router(service: Arc<QuoteServiceImpl>, gate: SharedGate) -> Router {
    Router::new()
        .route("/admin/stats", get(stats_handler))
        .route("/admin/analytics", get(analytics_handler))
        .route("/admin/quotes.csv", get(export_csv_handler))
        .route("/admin/database/export", get(export_database_handler))
        .route("/admin/database/import", post(import_database_handler))
        .route("/admin/database", delete(clear_database_handler))
        .route_layer(middleware::from_fn_with_state(gate, admin_gate))
        .with_state(service)
}
