use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info};
use validator::Validate;

use crate::dto::quote_dto::{
    ConfirmQuery, DeleteQuoteResponse, QuoteListQuery, SubmitQuoteRequest, SubmitQuoteResponse,
    UpdateQuotePriorityRequest, UpdateQuoteStatusRequest,
};
use crate::model::quote::QuotePatch;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};

// Handler: Submit Quote (public contact form)
pub async fn submit_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(payload): Json<SubmitQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[submit_quote_handler] Handler called");
    if let Err(e) = payload.validate() {
        error!("[submit_quote_handler] Validation error: {}", e);
        return Err(HandlerError::new(HandlerErrorKind::Validation, format!("Validation error: {}", e)));
    }
    let quote = service.submit_quote(payload.into()).await?;
    let body = SubmitQuoteResponse {
        quote,
        confirmation_display_secs: service.confirmation().as_secs(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// Handler: List Quotes (admin console)
pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(query): Query<QuoteListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let filter = query.to_filter()?;
    let quotes = service.list_quotes(&filter).await?;
    Ok(Json(quotes))
}

// Handler: Get Quote (admin console)
pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.get_quote(&id).await?;
    Ok(Json(quote))
}

// Handler: Patch Quote (admin console)
pub async fn update_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(patch): Json<QuotePatch>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.update_quote(&id, patch).await?;
    Ok(Json(quote))
}

// Handler: Update Quote Status (admin console)
pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.update_status(&id, payload.status).await?;
    Ok(Json(quote))
}

// Handler: Update Quote Priority (admin console)
pub async fn update_quote_priority_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuotePriorityRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.update_priority(&id, payload.priority).await?;
    Ok(Json(quote))
}

// Handler: Delete Quote (admin console, needs ?confirm=true)
pub async fn delete_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    if !confirm.confirm {
        return Err(HandlerError::bad_request("Deleting a quote needs confirm=true"));
    }
    let deleted = service.delete_quote(&id).await?;
    Ok(Json(DeleteQuoteResponse { deleted }))
}
