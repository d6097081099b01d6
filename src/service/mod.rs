pub mod access_gate;
pub mod analytics;
pub mod chat_relay;
pub mod chat_service;
pub mod gallery_service;
pub mod intake;
pub mod quote_service;
