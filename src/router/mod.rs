pub mod quote_router;
pub mod admin_router;
pub mod gate_router;
pub mod chat_router;
pub mod gallery_router;
