pub mod repository_error;
pub mod storage;
pub mod quote_repo;
pub mod credential_repo;
