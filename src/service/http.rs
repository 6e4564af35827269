//! `POST /analyze` JSON client.

use super::{build_http_client, service_error, transport_error, AnalysisService, ProgressSender};
use crate::config::ServiceConfig;
use crate::error::SubmitError;
use crate::models::{AnalysisRequest, AnalysisResult, AnalyzeResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the one-shot analysis endpoint.
pub struct HttpAnalysisClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpAnalysisClient {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        info!("Using analysis service at {}", config.url);

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http_client: build_http_client(config.timeout())?,
            timeout: config.timeout(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        _progress: ProgressSender,
    ) -> Result<AnalysisResult, SubmitError> {
        let url = self.endpoint();
        debug!("POST {} ({})", url, request.repo_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(e, &self.base_url, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, &self.base_url, self.timeout))?;

        interpret_response(status, &body)
    }
}

/// Map a received response onto the result or the matching error.
///
/// A success status with a body that is not an analysis envelope counts as
/// a transport failure: the exchange did not produce a usable response.
fn interpret_response(status: StatusCode, body: &str) -> Result<AnalysisResult, SubmitError> {
    if !status.is_success() {
        warn!("Analysis service returned {}", status);
        return Err(service_error(body));
    }

    serde_json::from_str::<AnalyzeResponse>(body)
        .map(|response| response.analysis)
        .map_err(|e| SubmitError::Transport(format!("Malformed analysis response: {}", e)))
}
