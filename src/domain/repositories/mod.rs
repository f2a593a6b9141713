pub mod backup_repository;
pub mod client_state_repository;
pub mod document_repository;
