use async_trait::async_trait;
use axum::{body::to_bytes, body::Body, http::{header, Request, StatusCode}, Router};
use ronitech_site::app::app::{create_router, AppServices};
use ronitech_site::config::{GateConfig, SiteConfig, StorageConfig};
use ronitech_site::model::gallery::GalleryItem;
use ronitech_site::repository::storage::InMemoryStorage;
use ronitech_site::service::chat_relay::{ChatError, CompletionProvider, ProviderFactory};
use ronitech_site::service::gallery_service::GalleryService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct EchoProvider;

#[async_trait]
impl CompletionProvider for EchoProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let turn = prompt.rsplit("User message: ").next().unwrap_or_default();
        Ok(format!("You asked: {}", turn))
    }
}

impl ProviderFactory for EchoProvider {
    fn build(&self, _credential: &str) -> Result<Arc<dyn CompletionProvider>, ChatError> {
        Ok(Arc::new(EchoProvider))
    }
}

async fn setup_app() -> Router {
    let gallery = GalleryService::new(vec![GalleryItem {
        id: "g1".to_string(),
        title: "Festival brochure".to_string(),
        description: "Print layout in Hindi and English".to_string(),
        image_url: "/img/g1.jpg".to_string(),
        category: "design".to_string(),
        created_at: 0,
    }]);
    let services = AppServices::build(
        Arc::new(InMemoryStorage::new()),
        &StorageConfig::from_test_env(),
        &GateConfig::from_test_env(),
        &SiteConfig::default(),
        Arc::new(EchoProvider),
        gallery,
    )
    .await
    .expect("Failed to build services");
    create_router(&services)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn unlock(app: &Router) {
    let (status, body) = send_json(app, "POST", "/gate/attempts", Some(json!({ "code": "RONITECH2025" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unlocked");
}

async fn submit_asha(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/quotes",
        Some(json!({
            "name": "Asha",
            "email": "a@x.com",
            "subject": "Website",
            "message": "Need a site",
            "service": "Website Development"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["confirmationDisplaySecs"], 3);
    body["quote"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_submit_validation() {
    let app = setup_app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/quotes",
        Some(json!({ "name": "Asha", "email": "nope", "subject": "Website", "message": "Need a site" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let (status, _) = send_json(
        &app,
        "POST",
        "/quotes",
        Some(json!({ "name": "   ", "email": "a@x.com", "subject": "Website", "message": "Need a site" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_hidden_until_unlocked() {
    let app = setup_app().await;
    submit_asha(&app).await;

    let (status, body) = send_json(&app, "GET", "/quotes", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
    let (status, _) = send_json(&app, "GET", "/admin/stats", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(&app, "POST", "/gate/attempts", Some(json!({ "code": "WRONG1" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid code. Attempt 1/3");

    unlock(&app).await;
    let (status, body) = send_json(&app, "GET", "/quotes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send_json(&app, "POST", "/admin/lock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "locked");
    let (status, _) = send_json(&app, "GET", "/quotes", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_gate_denies_after_three_misses() {
    let app = setup_app().await;
    for code in ["A", "B"] {
        let (status, _) = send_json(&app, "POST", "/gate/attempts", Some(json!({ "code": code }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = send_json(&app, "POST", "/gate/attempts", Some(json!({ "code": "C" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Too many failed attempts. Access denied.");

    let (status, body) = send_json(&app, "POST", "/gate/attempts", Some(json!({ "code": "RONITECH2025" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["outcome"], "refused");

    let (_, body) = send_json(&app, "GET", "/gate", None).await;
    assert_eq!(body["state"], "denied");
}

#[tokio::test]
async fn test_quote_admin_workflow() {
    let app = setup_app().await;
    let id = submit_asha(&app).await;
    unlock(&app).await;

    let (status, body) = send_json(&app, "PUT", &format!("/quotes/{}/status", id), Some(json!({ "status": "closed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");

    let (status, body) = send_json(&app, "PUT", &format!("/quotes/{}/priority", id), Some(json!({ "priority": "high" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"], "high");

    let (status, _) = send(&app, "PUT", &format!("/quotes/{}/status", id), Some(json!({ "status": "archived" }))).await;
    assert!(status.is_client_error());

    let (status, body) = send_json(&app, "PATCH", &format!("/quotes/{}", id), Some(json!({ "subject": "New website" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "New website");
    assert_eq!(body["id"], id.as_str());

    let (_, stats) = send_json(&app, "GET", "/admin/stats", None).await;
    assert_eq!(stats["totalQuotes"], 1);
    assert_eq!(stats["totalRevenue"], "₹25,000");

    let (_, analytics) = send_json(&app, "GET", "/admin/analytics", None).await;
    assert_eq!(analytics["statusDistribution"][3]["status"], "closed");
    assert_eq!(analytics["statusDistribution"][3]["percentage"], 100.0);
    assert_eq!(analytics["services"][0]["service"], "Website Development");
    assert_eq!(analytics["clients"][0]["quoteCount"], 1);

    let (_, filtered) = send_json(&app, "GET", "/quotes?status=new", None).await;
    assert!(filtered.as_array().unwrap().is_empty());
    let (status, _) = send_json(&app, "GET", "/quotes?status=archived", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, "PUT", "/quotes/quote_missing/status", Some(json!({ "status": "closed" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_json(&app, "GET", "/quotes/quote_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &format!("/quotes/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send_json(&app, "DELETE", &format!("/quotes/{}?confirm=true", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    let (_, body) = send_json(&app, "DELETE", &format!("/quotes/{}?confirm=true", id), None).await;
    assert_eq!(body["deleted"], false);
}

#[tokio::test]
async fn test_database_export_clear_import() {
    let app = setup_app().await;
    submit_asha(&app).await;
    unlock(&app).await;

    let req = Request::builder().uri("/admin/quotes.csv").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"ronitech_quotes_"));
    let csv = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    assert!(String::from_utf8(csv.to_vec()).unwrap().starts_with("Name,Email,Service,"));

    let req = Request::builder().uri("/admin/database/export").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("ronitech_database_"));
    let exported = String::from_utf8(to_bytes(resp.into_body(), 1024 * 1024).await.unwrap().to_vec()).unwrap();

    let (status, _) = send_json(&app, "DELETE", "/admin/database", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, stats) = send_json(&app, "DELETE", "/admin/database?confirm=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalQuotes"], 0);

    let req = Request::builder()
        .method("POST")
        .uri("/admin/database/import")
        .body(Body::from(r#"{"stats": {}}"#))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/admin/database/import")
        .body(Body::from(exported))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), 1024 * 1024).await.unwrap()).unwrap();
    assert_eq!(body["imported"], 1);
    assert_eq!(body["stats"]["newQuotes"], 1);
}

#[tokio::test]
async fn test_chat_routes() {
    let app = setup_app().await;

    let (status, _) = send_json(&app, "POST", "/chat/messages", Some(json!({ "message": "Hi" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(&app, "PUT", "/chat/credential", Some(json!({ "api_key": "AIzaSyA-1234567890" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], true);
    assert_eq!(body["maskedKey"], "••••••••••••••7890");

    let (_, messages) = send_json(&app, "GET", "/chat/messages", None).await;
    assert_eq!(messages[0]["role"], "assistant");

    let (status, reply) = send_json(&app, "POST", "/chat/messages", Some(json!({ "message": "Do you edit videos?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["content"], "You asked: Do you edit videos?");

    let (_, messages) = send_json(&app, "GET", "/chat/messages", None).await;
    assert_eq!(messages.as_array().unwrap().len(), 3);

    let (status, _) = send_json(&app, "POST", "/chat/close", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, messages) = send_json(&app, "GET", "/chat/messages", None).await;
    assert_eq!(messages.as_array().unwrap().len(), 1);

    let (_, body) = send_json(&app, "DELETE", "/chat/credential", None).await;
    assert_eq!(body["configured"], false);
    assert_eq!(body["maskedKey"], Value::Null);
}

#[tokio::test]
async fn test_gallery_routes() {
    let app = setup_app().await;
    let (_, categories) = send_json(&app, "GET", "/gallery/categories", None).await;
    assert_eq!(categories, json!(["all", "design"]));

    let (_, items) = send_json(&app, "GET", "/gallery?category=design", None).await;
    assert_eq!(items[0]["imageUrl"], "/img/g1.jpg");
    let (_, items) = send_json(&app, "GET", "/gallery?category=web", None).await;
    assert!(items.as_array().unwrap().is_empty());
}
