use axum::{Router, routing::{get, post}, middleware};
use crate::handler::gate_handler::{
    gate_view_handler,
    gate_attempt_handler,
    gate_close_handler,
    admin_lock_handler,
};
use crate::service::access_gate::SharedGate;
use crate::middlewares::admin_middleware::admin_gate;

pub fn gate_router(gate: SharedGate) -> Router {
    let public = Router::new()
        .route("/gate", get(gate_view_handler))
        .route("/gate/attempts", post(gate_attempt_handler))
        .route("/gate/close", post(gate_close_handler));

    // Leaving the console only makes sense from inside it
    let admin = Router::new()
        .route("/admin/lock", post(admin_lock_handler))
        .route_layer(middleware::from_fn_with_state(gate.clone(), admin_gate));

    public
        .merge(admin)
        .with_state(gate)
}
