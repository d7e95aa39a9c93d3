//! Retained view state the controller draws into; egui reads it each frame.

use std::time::{Duration, Instant};

use intake_core::{DisplaySurface, RecordView};

pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLabel {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Default)]
pub struct FormView {
    pub selected: Option<SelectedLabel>,
    pub submit_enabled: bool,
    pub busy: bool,
    pub record: Option<RecordView>,
    pub error: Option<String>,
    pub toast: Option<Toast>,
    /// Set when a fresh record arrives so the results panel scrolls into view once.
    pub scroll_to_results: bool,
}

impl FormView {
    /// Drops the toast once it has been visible for `lifetime`; returns whether
    /// one is still showing.
    pub fn expire_toast(&mut self, now: Instant, lifetime: Duration) -> bool {
        if let Some(toast) = &self.toast {
            if now.saturating_duration_since(toast.shown_at) >= lifetime {
                self.toast = None;
            }
        }
        self.toast.is_some()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl DisplaySurface for FormView {
    fn show_drop_zone(&mut self) {
        self.selected = None;
    }

    fn show_selected_file(&mut self, name: &str, size_label: &str) {
        self.selected = Some(SelectedLabel {
            name: name.to_string(),
            size_label: size_label.to_string(),
        });
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn show_record(&mut self, view: &RecordView) {
        self.record = Some(view.clone());
        self.scroll_to_results = true;
    }

    fn hide_record(&mut self) {
        self.record = None;
        self.scroll_to_results = false;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn show_success(&mut self, message: &str) {
        self.toast = Some(Toast {
            message: message.to_string(),
            shown_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::render_record;
    use shared::domain::ExtractedRecord;

    #[test]
    fn toast_expires_after_lifetime() {
        let mut view = FormView::default();
        view.show_success("Data copied to clipboard!");
        let shown_at = view.toast.as_ref().map(|t| t.shown_at).expect("toast");

        assert!(view.expire_toast(shown_at + Duration::from_secs(1), TOAST_LIFETIME));
        assert!(!view.expire_toast(shown_at + TOAST_LIFETIME, TOAST_LIFETIME));
        assert!(view.toast.is_none());
    }

    #[test]
    fn drop_zone_clears_selected_label() {
        let mut view = FormView::default();
        view.show_selected_file("cv.pdf", "12 KB");
        assert_eq!(
            view.selected,
            Some(SelectedLabel {
                name: "cv.pdf".into(),
                size_label: "12 KB".into()
            })
        );
        view.show_drop_zone();
        assert!(view.selected.is_none());
    }

    #[test]
    fn new_record_requests_scroll_once_hidden_clears_it() {
        let mut view = FormView::default();
        view.show_record(&render_record(&ExtractedRecord::default()));
        assert!(view.scroll_to_results);
        view.hide_record();
        assert!(view.record.is_none());
        assert!(!view.scroll_to_results);
    }
}
