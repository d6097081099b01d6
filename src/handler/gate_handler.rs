use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

use crate::service::access_gate::{GateOutcome, SharedGate};

#[derive(Debug, Deserialize)]
pub struct GateAttemptRequest {
    pub code: String,
}

fn outcome_status(outcome: &GateOutcome) -> StatusCode {
    match outcome {
        GateOutcome::Unlocked => StatusCode::OK,
        GateOutcome::EmptyCode => StatusCode::BAD_REQUEST,
        GateOutcome::Rejected { .. } => StatusCode::UNAUTHORIZED,
        GateOutcome::Denied { .. } => StatusCode::FORBIDDEN,
        GateOutcome::Refused { .. } => StatusCode::TOO_MANY_REQUESTS,
    }
}

pub async fn gate_view_handler(State(gate): State<SharedGate>) -> impl IntoResponse {
    Json(gate.lock().await.view(Instant::now()))
}

// Handler: Submit Gate Code
pub async fn gate_attempt_handler(
    State(gate): State<SharedGate>,
    Json(payload): Json<GateAttemptRequest>,
) -> impl IntoResponse {
    let outcome = gate.lock().await.submit(&payload.code, Instant::now());
    (outcome_status(&outcome), Json(outcome))
}

// Handler: Close Gate dialog
pub async fn gate_close_handler(State(gate): State<SharedGate>) -> impl IntoResponse {
    let mut gate = gate.lock().await;
    gate.close();
    Json(gate.view(Instant::now()))
}

// Handler: Leave Admin Console
pub async fn admin_lock_handler(State(gate): State<SharedGate>) -> impl IntoResponse {
    let mut gate = gate.lock().await;
    gate.close();
    info!("[admin_lock_handler] Admin console locked");
    Json(gate.view(Instant::now()))
}
