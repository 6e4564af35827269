//! Error taxonomy for a single submission.

use thiserror::Error;

/// Shown when the URL field is empty.
pub const VALIDATION_MESSAGE: &str = "Paste a URL first, rookie.";
/// Shown for any transport-level failure.
pub const TRANSPORT_MESSAGE: &str = "Server error. Check console.";
/// Shown when the service rejects a request without saying why.
pub const SERVICE_FALLBACK_MESSAGE: &str = "Something broke. Probably your code.";
/// Shown when a submission arrives while another one is pending.
pub const BUSY_MESSAGE: &str = "Hold on, still roasting the last one.";

/// Why a submission did not produce a rendered result.
///
/// Every variant leaves the controller in the idle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The URL was empty; nothing was sent.
    #[error("repository URL is empty")]
    Validation,

    /// Another request is already pending on this controller.
    #[error("a request is already pending")]
    Busy,

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status. Holds the
    /// service-supplied message, if any.
    #[error("service error: {}", .0.as_deref().unwrap_or(SERVICE_FALLBACK_MESSAGE))]
    Service(Option<String>),
}

impl SubmitError {
    /// The text shown to the user in the alert.
    /// Transport details are logged, not shown.
    pub fn user_message(&self) -> &str {
        match self {
            SubmitError::Validation => VALIDATION_MESSAGE,
            SubmitError::Busy => BUSY_MESSAGE,
            SubmitError::Transport(_) => TRANSPORT_MESSAGE,
            SubmitError::Service(Some(message)) => message,
            SubmitError::Service(None) => SERVICE_FALLBACK_MESSAGE,
        }
    }

    /// Process exit code for a one-shot run ending in this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitError::Service(_) => 2,
            _ => 1,
        }
    }
}
