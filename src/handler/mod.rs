pub mod quote_handler;
pub mod admin_handler;
pub mod gate_handler;
pub mod chat_handler;
pub mod gallery_handler;
