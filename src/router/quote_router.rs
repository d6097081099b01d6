use axum::{Router, routing::{get, post, put}, middleware};
use crate::handler::quote_handler::{
    submit_quote_handler,
    list_quotes_handler,
    get_quote_handler,
    update_quote_handler,
    update_quote_status_handler,
    update_quote_priority_handler,
    delete_quote_handler,
};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;
use crate::service::access_gate::SharedGate;
use crate::middlewares::admin_middleware::admin_gate;


pub fn quote_router(service: Arc<QuoteServiceImpl>, gate: SharedGate) -> Router {
    // Public contact form
    let public = Router::new()
        .route("/quotes", post(submit_quote_handler));

    // Admin console routes
    let admin = Router::new()
        .route("/quotes", get(list_quotes_handler))
        .route(
            "/quotes/{id}",
            get(get_quote_handler).patch(update_quote_handler).delete(delete_quote_handler),
        )
        .route("/quotes/{id}/status", put(update_quote_status_handler))
        .route("/quotes/{id}/priority", put(update_quote_priority_handler))
        .route_layer(middleware::from_fn_with_state(gate, admin_gate));

    public
        .merge(admin)
        .with_state(service)
}
