//! Clients for the remote analysis service.

mod http;
mod stream;

pub use http::HttpAnalysisClient;
pub use stream::StreamingAnalysisClient;

use crate::config::ServiceConfig;
use crate::error::SubmitError;
use crate::models::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Channel for live progress text pushed by the service.
pub type ProgressSender = UnboundedSender<String>;

/// One round trip to the analysis service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyze a repository. Implementations that receive progress from the
    /// service forward it on `progress`; others just drop the sender.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        progress: ProgressSender,
    ) -> Result<AnalysisResult, SubmitError>;
}

/// Build the client selected by the configuration.
pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Box<dyn AnalysisService>> {
    if config.streaming {
        Ok(Box::new(StreamingAnalysisClient::new(config)?))
    } else {
        Ok(Box::new(HttpAnalysisClient::new(config)?))
    }
}

fn build_http_client(timeout: Option<Duration>) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))
}

/// Turn a reqwest failure into a transport error with a readable reason.
fn transport_error(e: reqwest::Error, base_url: &str, timeout: Option<Duration>) -> SubmitError {
    let reason = if e.is_timeout() {
        match timeout {
            Some(t) => format!("Request timed out after {}s", t.as_secs()),
            None => "Request timed out".to_string(),
        }
    } else if e.is_connect() {
        format!("Cannot connect to analysis service at {}", base_url)
    } else {
        format!("Failed to send request: {}", e)
    };
    SubmitError::Transport(reason)
}

/// Interpret the body of a non-success response.
///
/// A missing, empty or non-string `error` field yields the fallback.
fn service_error(body: &str) -> SubmitError {
    let message = serde_json::from_str::<crate::models::ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty());
    SubmitError::Service(message)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_with_message() {
        assert_eq!(
            service_error(r#"{"error":"repo not found"}"#),
            SubmitError::Service(Some("repo not found".to_string()))
        );
    }

    #[test]
    fn test_service_error_fallbacks() {
        assert_eq!(service_error("{}"), SubmitError::Service(None));
        assert_eq!(service_error(r#"{"error":""}"#), SubmitError::Service(None));
        assert_eq!(service_error(r#"{"error":42}"#), SubmitError::Service(None));
        assert_eq!(service_error("<html>502</html>"), SubmitError::Service(None));
    }

    #[test]
    fn test_from_config_builds_both_clients() {
        let mut config = ServiceConfig::default();
        assert!(from_config(&config).is_ok());
        config.streaming = true;
        config.timeout_seconds = 0;
        assert!(from_config(&config).is_ok());
    }
}
