pub mod quote;
pub mod chat;
pub mod gallery;
