use axum::{Router, routing::get};
use crate::handler::gallery_handler::{list_gallery_handler, gallery_categories_handler};
use std::sync::Arc;
use crate::service::gallery_service::GalleryService;

pub fn gallery_router(service: Arc<GalleryService>) -> Router {
    Router::new()
        .route("/gallery", get(list_gallery_handler))
        .route("/gallery/categories", get(gallery_categories_handler))
        .with_state(service)
}
