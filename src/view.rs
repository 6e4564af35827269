//! The UI surface the controller drives.
//!
//! [`TerminalView`] maps it onto a terminal: the loading indicator is an
//! `indicatif` spinner, alerts go to stderr and results to stdout.

use crate::render::ResultsPanel;
use crate::report;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Everything the controller can do to the screen.
///
/// Methods take `&self` because the loading ticker updates the label from
/// its own task while the controller waits on the network.
pub trait View: Send + Sync {
    fn hide_results(&self);
    fn show_loading(&self);
    fn set_loading_message(&self, message: &str);
    fn hide_loading(&self);
    fn show_results(&self, panel: &ResultsPanel);
    /// Blocking notification. The terminal cannot block, so it just prints.
    fn alert(&self, message: &str);
}

/// Terminal implementation of [`View`].
pub struct TerminalView {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
    print_results: bool,
}

impl TerminalView {
    /// `quiet` hides the spinner; `print_results` controls whether rendered
    /// results are printed as a banner.
    pub fn new(quiet: bool, print_results: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet,
            print_results,
        }
    }

    fn spinner(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl View for TerminalView {
    /// Printed results stay in the terminal scrollback; the next banner
    /// replaces them visually.
    fn hide_results(&self) {}

    fn show_loading(&self) {
        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        if let Some(previous) = self.spinner().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn set_loading_message(&self, message: &str) {
        if let Some(pb) = self.spinner().as_ref() {
            pb.set_message(message.to_string());
        }
    }

    fn hide_loading(&self) {
        if let Some(pb) = self.spinner().take() {
            pb.finish_and_clear();
        }
    }

    fn show_results(&self, panel: &ResultsPanel) {
        if self.print_results && panel.visible {
            println!("{}", report::generate_terminal_report(panel));
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One call made on a [`RecordingView`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum ViewEvent {
        HideResults,
        ShowLoading,
        LoadingMessage(String),
        HideLoading,
        ShowResults(ResultsPanel),
        Alert(String),
    }

    /// A view that records every call, in order.
    #[derive(Default)]
    pub(crate) struct RecordingView {
        events: Mutex<Vec<ViewEvent>>,
    }

    impl RecordingView {
        pub(crate) fn events(&self) -> Vec<ViewEvent> {
            self.events.lock().unwrap().clone()
        }

        pub(crate) fn loading_messages(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::LoadingMessage(m) => Some(m),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn alerts(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Alert(m) => Some(m),
                    _ => None,
                })
                .collect()
        }

        fn push(&self, event: ViewEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl View for RecordingView {
        fn hide_results(&self) {
            self.push(ViewEvent::HideResults);
        }

        fn show_loading(&self) {
            self.push(ViewEvent::ShowLoading);
        }

        fn set_loading_message(&self, message: &str) {
            self.push(ViewEvent::LoadingMessage(message.to_string()));
        }

        fn hide_loading(&self) {
            self.push(ViewEvent::HideLoading);
        }

        fn show_results(&self, panel: &ResultsPanel) {
            self.push(ViewEvent::ShowResults(panel.clone()));
        }

        fn alert(&self, message: &str) {
            self.push(ViewEvent::Alert(message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_terminal_view_lifecycle() {
        let view = TerminalView::new(true, false);
        view.show_loading();
        view.set_loading_message("working");
        assert!(view.spinner().is_some());
        view.hide_loading();
        assert!(view.spinner().is_none());
    }

    #[test]
    fn test_set_message_without_spinner_is_noop() {
        let view = TerminalView::new(true, false);
        view.set_loading_message("nobody listening");
        assert!(view.spinner().is_none());
    }

    #[test]
    fn test_hide_results_leaves_spinner_alone() {
        let view = TerminalView::new(true, false);
        view.show_loading();
        view.hide_results();
        assert!(view.spinner().is_some());
        view.hide_loading();
    }
}
