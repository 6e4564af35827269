//! Data models for the roast client.
//!
//! This module contains the wire types exchanged with the analysis
//! service and the verdict classification used by the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a `POST /analyze` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Repository URL exactly as entered by the user.
    pub repo_url: String,
}

impl AnalysisRequest {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
        }
    }
}

/// Presentation bucket for a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictCategory {
    /// "Ship It" territory
    Positive,
    /// "Almost There" territory
    Cautionary,
    /// Everything else
    Negative,
}

impl fmt::Display for VerdictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictCategory::Positive => write!(f, "Positive"),
            VerdictCategory::Cautionary => write!(f, "Cautionary"),
            VerdictCategory::Negative => write!(f, "Negative"),
        }
    }
}

impl VerdictCategory {
    /// Keyword marking a positive verdict.
    pub const POSITIVE_MARKER: &'static str = "Ship";
    /// Keyword marking a cautionary verdict.
    pub const CAUTIONARY_MARKER: &'static str = "Almost";

    /// Classify a free-text verdict.
    ///
    /// Checks the positive marker first, then the cautionary marker, and
    /// falls back to negative. Matching is a case-sensitive substring test.
    pub fn classify(verdict: &str) -> Self {
        if verdict.contains(Self::POSITIVE_MARKER) {
            VerdictCategory::Positive
        } else if verdict.contains(Self::CAUTIONARY_MARKER) {
            VerdictCategory::Cautionary
        } else {
            VerdictCategory::Negative
        }
    }

    /// Returns an emoji representation of the category.
    pub fn emoji(&self) -> &'static str {
        match self {
            VerdictCategory::Positive => "🟢",
            VerdictCategory::Cautionary => "🟡",
            VerdictCategory::Negative => "🔴",
        }
    }
}

/// The verdict and feedback lists produced by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Free-text verdict, e.g. "Ship It", "Almost There", "Skip It".
    pub verdict: String,
    /// Roast sentences.
    #[serde(default)]
    pub roast: Vec<String>,
    /// Genuine compliments.
    #[serde(default)]
    pub good_things: Vec<String>,
    /// Actionable advice.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Explicit classification, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict_category: Option<VerdictCategory>,
}

impl AnalysisResult {
    /// The presentation category: the explicit one if supplied, otherwise
    /// keyword classification of the verdict text.
    pub fn category(&self) -> VerdictCategory {
        self.verdict_category
            .unwrap_or_else(|| VerdictCategory::classify(&self.verdict))
    }
}

/// Successful `POST /analyze` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

/// Body of a failed response. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// One `data:` payload of the `/stream_analyze` event stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub final_data: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Live progress text.
    Status(String),
    /// Terminal success event.
    Complete(AnalysisResult),
    /// Terminal failure event.
    Failed(String),
}

impl StreamPayload {
    /// Decode the payload. `error` takes precedence over `final_data`,
    /// which takes precedence over a bare `status`.
    pub fn into_event(self) -> Option<StreamEvent> {
        if let Some(error) = self.error {
            return Some(StreamEvent::Failed(error));
        }
        if let Some(result) = self.final_data {
            return Some(StreamEvent::Complete(result));
        }
        self.status.map(StreamEvent::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_positive() {
        assert_eq!(VerdictCategory::classify("Ship It"), VerdictCategory::Positive);
    }

    #[test]
    fn test_classify_cautionary() {
        assert_eq!(
            VerdictCategory::classify("Almost There"),
            VerdictCategory::Cautionary
        );
    }

    #[test]
    fn test_classify_negative_fallback() {
        assert_eq!(
            VerdictCategory::classify("Rewrite Everything"),
            VerdictCategory::Negative
        );
        assert_eq!(VerdictCategory::classify("Skip It"), VerdictCategory::Negative);
    }

    #[test]
    fn test_classify_positive_checked_first() {
        assert_eq!(
            VerdictCategory::classify("Almost ready to Ship"),
            VerdictCategory::Positive
        );
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(VerdictCategory::classify("ship it"), VerdictCategory::Negative);
    }

    #[test]
    fn test_explicit_category_overrides_keywords() {
        let json = r#"{"verdict":"Ship It","roast":[],"good_things":[],"suggestions":[],"verdict_category":"negative"}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.category(), VerdictCategory::Negative);
    }

    #[test]
    fn test_parse_analyze_response() {
        let json = r#"{"analysis":{"verdict":"Ship It","roast":["a"],"good_things":["b"],"suggestions":["c"]}}"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.analysis.verdict, "Ship It");
        assert_eq!(response.analysis.roast, vec!["a"]);
        assert_eq!(response.analysis.verdict_category, None);
    }

    #[test]
    fn test_request_serializes_repo_url_only() {
        let body = serde_json::to_value(AnalysisRequest::new("https://github.com/a/b")).unwrap();
        assert_eq!(body, serde_json::json!({"repo_url": "https://github.com/a/b"}));
    }

    #[test]
    fn test_stream_payload_error_wins() {
        let payload: StreamPayload =
            serde_json::from_str(r#"{"status":"x","error":"Server Error: boom"}"#).unwrap();
        assert_eq!(payload.into_event(), Some(StreamEvent::Failed("Server Error: boom".to_string())));
    }

    #[test]
    fn test_stream_payload_empty_is_ignored() {
        assert_eq!(StreamPayload::default().into_event(), None);
    }
}
