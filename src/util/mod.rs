pub mod currency;
pub mod csv;
pub mod id;
pub mod logger;
pub mod error;
