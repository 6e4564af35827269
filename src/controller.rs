//! The analysis request controller.
//!
//! Owns the idle/pending state, drives the loading indicator for the
//! lifetime of one request and hands successful results to the renderer.

use crate::config::LoadingConfig;
use crate::error::SubmitError;
use crate::loading::{LoadingCycle, LoadingTicker};
use crate::models::AnalysisRequest;
use crate::render::ResultsPanel;
use crate::service::AnalysisService;
use crate::view::View;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, error, info, warn};

/// Where the controller is in a request's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Ready to accept a submission.
    Idle,
    /// Waiting on the analysis service.
    Pending { repo_url: String },
}

pub struct Controller {
    service: Box<dyn AnalysisService>,
    view: Arc<dyn View>,
    loading: LoadingConfig,
    state: Mutex<ControllerState>,
    panel: Mutex<ResultsPanel>,
}

impl Controller {
    pub fn new(
        service: Box<dyn AnalysisService>,
        view: Arc<dyn View>,
        loading: LoadingConfig,
    ) -> Self {
        Self {
            service,
            view,
            loading,
            state: Mutex::new(ControllerState::Idle),
            panel: Mutex::new(ResultsPanel::new()),
        }
    }

    pub fn state(&self) -> ControllerState {
        lock(&self.state).clone()
    }

    /// Submit a repository URL for analysis.
    ///
    /// Returns the rendered panel on success. Every error has already been
    /// shown to the user through [`View::alert`] when this returns, and the
    /// controller is idle again on every path.
    pub async fn submit(&self, url: &str) -> Result<ResultsPanel, SubmitError> {
        if url.is_empty() {
            warn!("Rejected empty repository URL");
            return Err(self.fail(SubmitError::Validation));
        }

        let _pending = match PendingGuard::acquire(&self.state, url) {
            Ok(guard) => guard,
            Err(in_flight) => {
                warn!("Rejected {}: {} is still pending", url, in_flight);
                return Err(self.fail(SubmitError::Busy));
            }
        };

        self.hide_results();
        self.view.show_loading();

        let (progress_tx, progress_rx) = unbounded_channel();
        let ticker = LoadingTicker::start(
            self.view.clone(),
            LoadingCycle::new(self.loading.messages.clone()),
            self.loading.interval(),
            Some(progress_rx),
        );

        info!("Submitting {} for analysis", url);
        let outcome = self
            .service
            .analyze(&AnalysisRequest::new(url), progress_tx)
            .await;

        ticker.stop().await;
        self.view.hide_loading();

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                match &err {
                    SubmitError::Transport(reason) => error!("Analysis request failed: {}", reason),
                    other => warn!("Analysis request failed: {}", other),
                }
                return Err(self.fail(err));
            }
        };

        info!("Verdict for {}: {}", url, result.verdict);
        let panel = {
            let mut panel = lock(&self.panel);
            panel.render(&result);
            panel.clone()
        };
        self.view.show_results(&panel);

        Ok(panel)
    }

    fn hide_results(&self) {
        lock(&self.panel).hide();
        self.view.hide_results();
    }

    fn fail(&self, err: SubmitError) -> SubmitError {
        self.view.alert(err.user_message());
        err
    }
}

/// Marks the controller pending for as long as it lives.
///
/// Dropping it (normal return, early error return, or the submit future
/// being dropped mid-request) puts the controller back to idle.
struct PendingGuard<'a> {
    state: &'a Mutex<ControllerState>,
}

impl<'a> PendingGuard<'a> {
    /// Move from idle to pending. Fails with the in-flight URL if a
    /// request is already pending.
    fn acquire(state: &'a Mutex<ControllerState>, repo_url: &str) -> Result<Self, String> {
        let mut current = lock(state);
        if let ControllerState::Pending { repo_url: in_flight } = &*current {
            return Err(in_flight.clone());
        }
        *current = ControllerState::Pending {
            repo_url: repo_url.to_string(),
        };
        Ok(Self { state })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = ControllerState::Idle;
        debug!("Controller idle");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
