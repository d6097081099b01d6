use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::service::gallery_service::GalleryService;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

pub async fn list_gallery_handler(
    State(gallery): State<Arc<GalleryService>>,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    Json(gallery.items(query.category.as_deref()))
}

pub async fn gallery_categories_handler(State(gallery): State<Arc<GalleryService>>) -> impl IntoResponse {
    Json(gallery.categories())
}
