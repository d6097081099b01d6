use axum::{Router, routing::get};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, GateConfig, GeminiConfig, SiteConfig, StorageConfig};
use crate::repository::credential_repo::CredentialRepository;
use crate::repository::quote_repo::JsonQuoteRepository;
use crate::repository::storage::{FileStorage, KeyValueStorage};
use crate::router::admin_router::admin_router;
use crate::router::chat_router::chat_router;
use crate::router::gallery_router::gallery_router;
use crate::router::gate_router::gate_router;
use crate::router::quote_router::quote_router;
use crate::service::access_gate::{AccessGate, SharedGate};
use crate::service::chat_relay::{ChatRelay, GeminiProviderFactory, ProviderFactory};
use crate::service::chat_service::ChatServiceImpl;
use crate::service::gallery_service::GalleryService;
use crate::service::quote_service::QuoteServiceImpl;

/// Everything the routers hand out as state.
#[derive(Clone)]
pub struct AppServices {
    pub quote_service: Arc<QuoteServiceImpl>,
    pub chat_service: Arc<ChatServiceImpl>,
    pub gallery_service: Arc<GalleryService>,
    pub gate: SharedGate,
}

impl AppServices {
    /// Wire the services over `storage`. The chat relay uses `provider_factory`.
    pub async fn build(
        storage: Arc<dyn KeyValueStorage>,
        storage_config: &StorageConfig,
        gate_config: &GateConfig,
        site_config: &SiteConfig,
        provider_factory: Arc<dyn ProviderFactory>,
        gallery_service: GalleryService,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let quote_repo = Arc::new(JsonQuoteRepository::open(storage.clone(), &storage_config.database_key).await?);
        let quote_service = Arc::new(
            QuoteServiceImpl::new(quote_repo).with_confirmation(site_config.confirmation()),
        );

        let credentials = CredentialRepository::new(storage, &storage_config.credential_key);
        let chat_service = Arc::new(ChatServiceImpl::new(ChatRelay::new(provider_factory), credentials));
        if let Err(e) = chat_service.restore().await {
            warn!("Stored chat credential could not be restored: {e}");
        }

        Ok(AppServices {
            quote_service,
            chat_service,
            gallery_service: Arc::new(gallery_service),
            gate: AccessGate::shared(gate_config),
        })
    }
}

pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .merge(quote_router(services.quote_service.clone(), services.gate.clone()))
        .merge(admin_router(services.quote_service.clone(), services.gate.clone()))
        .merge(gate_router(services.gate.clone()))
        .merge(chat_router(services.chat_service.clone()))
        .merge(gallery_router(services.gallery_service.clone()))
        .route("/health", get(|| async { "OK" }))
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub services: AppServices,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let storage_config = StorageConfig::from_env()?;
        let gate_config = GateConfig::from_env()?;
        let gemini_config = GeminiConfig::from_env()?;
        let site_config = SiteConfig::from_env()?;

        let storage = Arc::new(FileStorage::new(&storage_config.data_dir).await?);
        let gallery = GalleryService::load(site_config.gallery_path.as_deref()).await?;
        let services = AppServices::build(
            storage,
            &storage_config,
            &gate_config,
            &site_config,
            Arc::new(GeminiProviderFactory::new(gemini_config)),
            gallery,
        )
        .await?;

        let router = create_router(&services);
        Ok(App { config, router, services })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.socket_addr()?;
        if !addr.ip().is_loopback() {
            warn!("Binding to non-loopback address {}; this service has no authentication", addr);
        }
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
