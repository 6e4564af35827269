//! Results panel state and rendering of an analysis result into it.

use crate::models::{AnalysisResult, VerdictCategory};
use serde::Serialize;

/// What the results view displays.
///
/// Rendering into a panel replaces its previous contents, so the same
/// panel can be reused across submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultsPanel {
    /// Whether the results view is shown.
    #[serde(skip)]
    pub visible: bool,
    /// Uppercased verdict.
    pub headline: String,
    /// Banner style. `None` until the first render.
    pub category: Option<VerdictCategory>,
    pub roast: Vec<String>,
    pub good_things: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `result` into the panel and reveal it.
    pub fn render(&mut self, result: &AnalysisResult) {
        self.category = Some(result.category());
        self.headline = escape_plain_text(&result.verdict.to_uppercase());

        populate_list(&mut self.roast, &result.roast);
        populate_list(&mut self.good_things, &result.good_things);
        populate_list(&mut self.suggestions, &result.suggestions);

        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Replace `list` with one plain-text entry per item, in order.
fn populate_list(list: &mut Vec<String>, items: &[String]) {
    list.clear();
    list.extend(items.iter().map(|item| escape_plain_text(item)));
}

/// Neutralize text from the service so a terminal shows it literally.
///
/// ANSI escape sequences are removed, line breaks and tabs become spaces,
/// and any other control character is dropped.
pub fn escape_plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => {
                // CSI: ESC [ params... final byte in @..~
                if chars.peek() == Some(&'[') {
                    chars.next();
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                } else {
                    chars.next();
                }
            }
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(verdict: &str, roast: &[&str], good: &[&str], fixes: &[&str]) -> AnalysisResult {
        AnalysisResult {
            verdict: verdict.to_string(),
            roast: roast.iter().map(|s| s.to_string()).collect(),
            good_things: good.iter().map(|s| s.to_string()).collect(),
            suggestions: fixes.iter().map(|s| s.to_string()).collect(),
            verdict_category: None,
        }
    }

    #[test]
    fn test_render_ship_it() {
        let mut panel = ResultsPanel::new();
        panel.render(&result("Ship It", &["a"], &["b"], &["c"]));

        assert!(panel.visible);
        assert_eq!(panel.headline, "SHIP IT");
        assert_eq!(panel.category, Some(VerdictCategory::Positive));
        assert_eq!(panel.roast, vec!["a"]);
        assert_eq!(panel.good_things, vec!["b"]);
        assert_eq!(panel.suggestions, vec!["c"]);
    }

    #[test]
    fn test_render_categories() {
        let mut panel = ResultsPanel::new();

        panel.render(&result("Almost There", &[], &[], &[]));
        assert_eq!(panel.category, Some(VerdictCategory::Cautionary));

        panel.render(&result("Rewrite Everything", &[], &[], &[]));
        assert_eq!(panel.category, Some(VerdictCategory::Negative));
        assert_eq!(panel.headline, "REWRITE EVERYTHING");
    }

    #[test]
    fn test_render_replaces_previous_items() {
        let mut panel = ResultsPanel::new();
        panel.render(&result("Ship It", &["old1", "old2"], &["old"], &["old"]));
        panel.render(&result("Skip It", &["new"], &["n1", "n2"], &[]));

        assert_eq!(panel.roast, vec!["new"]);
        assert_eq!(panel.good_things, vec!["n1", "n2"]);
        assert!(panel.suggestions.is_empty());
    }

    #[test]
    fn test_render_keeps_order_and_duplicates() {
        let mut panel = ResultsPanel::new();
        panel.render(&result("Skip It", &["z", "a", "z"], &[], &[]));
        assert_eq!(panel.roast, vec!["z", "a", "z"]);
    }

    #[test]
    fn test_render_escapes_untrusted_text() {
        let mut panel = ResultsPanel::new();
        panel.render(&result(
            "Ship \u{1b}[2JIt",
            &["<b>bold</b>\u{1b}[31m red"],
            &["line1\nline2"],
            &["bell\u{7}"],
        ));

        assert_eq!(panel.headline, "SHIP IT");
        assert_eq!(panel.roast, vec!["<b>bold</b> red"]);
        assert_eq!(panel.good_things, vec!["line1 line2"]);
        assert_eq!(panel.suggestions, vec!["bell"]);
    }

    #[test]
    fn test_hide() {
        let mut panel = ResultsPanel::new();
        panel.render(&result("Ship It", &[], &[], &[]));
        panel.hide();
        assert!(!panel.visible);
        assert_eq!(panel.headline, "SHIP IT");
    }
}
