pub mod client_state_file;
pub mod file_repository;
pub mod http_repository;
pub mod json_backup_repository;
