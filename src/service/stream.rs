//! `GET /stream_analyze` server-sent events client.

use super::{build_http_client, service_error, transport_error, AnalysisService, ProgressSender};
use crate::config::ServiceConfig;
use crate::error::SubmitError;
use crate::models::{AnalysisRequest, AnalysisResult, StreamEvent, StreamPayload};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the streaming endpoint, which reports agent progress before
/// the final result.
pub struct StreamingAnalysisClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl StreamingAnalysisClient {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        info!("Using streaming analysis service at {}", config.url);

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http_client: build_http_client(config.timeout())?,
            timeout: config.timeout(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/stream_analyze", self.base_url)
    }
}

#[async_trait]
impl AnalysisService for StreamingAnalysisClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        progress: ProgressSender,
    ) -> Result<AnalysisResult, SubmitError> {
        let url = self.endpoint();
        debug!("GET {} ({})", url, request.repo_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("repo_url", request.repo_url.as_str())])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| transport_error(e, &self.base_url, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Analysis service returned {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(service_error(&body));
        }

        let mut decoder = SseDecoder::default();
        let mut chunks = response.bytes_stream();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| transport_error(e, &self.base_url, self.timeout))?;
            for event in decoder.push(&chunk)? {
                if let Some(result) = handle_event(event, &progress)? {
                    return Ok(result);
                }
            }
        }

        for event in decoder.finish() {
            if let Some(result) = handle_event(event, &progress)? {
                return Ok(result);
            }
        }

        Err(SubmitError::Transport(
            "Event stream ended without a result".to_string(),
        ))
    }
}

/// Forward progress, or resolve on a terminal event.
fn handle_event(
    event: StreamEvent,
    progress: &ProgressSender,
) -> Result<Option<AnalysisResult>, SubmitError> {
    match event {
        StreamEvent::Status(status) => {
            debug!("Service status: {}", status);
            // The receiver is gone once the submission resolved
            let _ = progress.send(status);
            Ok(None)
        }
        StreamEvent::Complete(result) => Ok(Some(result)),
        StreamEvent::Failed(message) => {
            warn!("Analysis failed on the service: {}", message);
            Err(SubmitError::Service(Some(message).filter(|m| !m.is_empty())))
        }
    }
}

/// Incremental decoder for `data:` lines of a `text/event-stream` body.
///
/// Works on bytes so a chunk boundary inside a UTF-8 sequence is harmless.
#[derive(Debug)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    max_line_bytes: usize,
}

/// Longest event line buffered while waiting for its newline.
const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_line_limit(MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    pub(crate) fn with_line_limit(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_bytes,
        }
    }

    /// Feed a chunk and return the events completed by it.
    ///
    /// Fails once an unterminated line outgrows the line limit.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, SubmitError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&line) {
                events.push(event);
            }
        }

        if self.buffer.len() > self.max_line_bytes {
            warn!(
                "Event line exceeded {} bytes without a newline",
                self.max_line_bytes
            );
            self.buffer.clear();
            return Err(SubmitError::Transport(
                "Event stream line too long".to_string(),
            ));
        }
        Ok(events)
    }

    /// Decode whatever is left once the stream has ended.
    pub(crate) fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest).into_iter().collect()
    }
}

fn decode_line(raw: &[u8]) -> Option<StreamEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);

    let data = line.strip_prefix("data:")?.trim_start();
    match serde_json::from_str::<StreamPayload>(data) {
        Ok(payload) => payload.into_event(),
        Err(e) => {
            debug!("Skipping undecodable event payload: {}", e);
            None
        }
    }
}
