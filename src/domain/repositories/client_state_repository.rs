// src/domain/repositories/client_state_repository.rs
use crate::domain::client_state::ClientState;
use crate::domain::error::DomainResult;
use std::fmt::Debug;

/// Persistence of client-local settings (the browser's localStorage equivalent)
pub trait ClientStateRepository: Debug + Send + Sync {
    fn load(&self) -> DomainResult<ClientState>;
    fn save(&self, state: &ClientState) -> DomainResult<()>;
}
