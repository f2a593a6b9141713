// src/infrastructure/repositories/http_repository.rs

use crate::domain::error::DomainResult;
use crate::domain::repositories::document_repository::DocumentRepository;
use crate::infrastructure::error::InfrastructureError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Path of the single data endpoint, relative to the server URL
pub const DATA_ENDPOINT: &str = "/api/data";

/// Talks to the persistence endpoint: `GET` fetches, `POST` replaces
#[derive(Debug, Clone)]
pub struct HttpDocumentRepository {
    endpoint: String,
    client: Client,
}

impl HttpDocumentRepository {
    pub fn new(server_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new()); // Fallback to default client in case of builder failure
        Self {
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), DATA_ENDPOINT),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get(&self) -> Result<Value, InfrastructureError> {
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::Backend {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json::<Value>()?)
    }

    fn post(&self, value: &Value) -> Result<(), InfrastructureError> {
        let response = self.client.post(&self.endpoint).json(value).send()?;
        let status = response.status();
        let message = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(InfrastructureError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        debug!("Backend confirmed save: {}", message);
        Ok(())
    }
}

impl DocumentRepository for HttpDocumentRepository {
    #[instrument(skip(self), fields(endpoint = %self.endpoint), level = "debug")]
    fn fetch(&self) -> DomainResult<Value> {
        Ok(self.get()?)
    }

    #[instrument(skip(self, value), fields(endpoint = %self.endpoint), level = "debug")]
    fn store(&self, value: &Value) -> DomainResult<()> {
        Ok(self.post(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3003", "http://localhost:3003/api/data")]
    #[case("http://localhost:3003/", "http://localhost:3003/api/data")]
    #[case("https://nav.example.com/base", "https://nav.example.com/base/api/data")]
    fn given_server_url_when_new_then_endpoint_joined(#[case] server: &str, #[case] expected: &str) {
        let repo = HttpDocumentRepository::new(server, Duration::from_millis(100));
        assert_eq!(repo.endpoint(), expected);
    }

    #[test]
    fn given_unreachable_server_when_fetch_then_error() {
        // port 9 (discard) is not expected to run an HTTP server
        let repo = HttpDocumentRepository::new("http://127.0.0.1:9", Duration::from_millis(500));
        assert!(repo.fetch().is_err());
    }
}
