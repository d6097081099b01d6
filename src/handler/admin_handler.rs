use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::dto::quote_dto::{ConfirmQuery, ImportDatabaseResponse, QuoteListQuery};
use crate::service::quote_service::{database_export_name, quotes_csv_name, QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

pub async fn stats_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.stats().await?))
}

pub async fn analytics_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.analytics().await?))
}

// Handler: CSV of the currently filtered quotes
pub async fn export_csv_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(query): Query<QuoteListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let filter = query.to_filter()?;
    let csv = service.export_csv(&filter).await?;
    let file_name = quotes_csv_name(Utc::now().date_naive());
    info!("[export_csv_handler] Sending {}", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
        ],
        csv,
    ))
}

pub async fn export_database_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let json = service.export_database().await?;
    let file_name = database_export_name(Utc::now().date_naive());
    info!("[export_database_handler] Sending {}", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
        ],
        json,
    ))
}

// Handler: Import Database. The body is the raw export file.
pub async fn import_database_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    body: String,
) -> Result<impl IntoResponse, HandlerError> {
    let imported = service.import_database(&body).await?;
    let stats = service.stats().await?;
    Ok(Json(ImportDatabaseResponse { imported, stats }))
}

// Handler: Clear Database (needs ?confirm=true)
pub async fn clear_database_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    if !confirm.confirm {
        warn!("[clear_database_handler] Refused without confirmation");
        return Err(HandlerError::bad_request("Clearing the database needs confirm=true"));
    }
    service.clear_database().await?;
    Ok(Json(service.stats().await?))
}
