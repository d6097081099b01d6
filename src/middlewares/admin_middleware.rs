use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::service::access_gate::SharedGate;
use crate::util::error::{HandlerError, HandlerErrorKind};

/// Hides the admin console routes until the gate is unlocked.
///
/// This only mirrors the visibility of the console. It is not authentication: any
/// local caller that knows the shipped code can unlock it.
pub async fn admin_gate(
    State(gate): State<SharedGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let unlocked = {
        let mut gate = gate.lock().await;
        gate.refresh(Instant::now());
        gate.is_unlocked()
    };
    if !unlocked {
        warn!(path = %req.uri().path(), "Admin console request while gate is locked");
        return Err(HandlerError::new(HandlerErrorKind::Forbidden, "Admin console is locked"));
    }
    Ok(next.run(req).await)
}
