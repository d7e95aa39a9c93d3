//! Line-oriented [`DisplaySurface`] for the command-line front-end.

use intake_core::{DisplaySurface, RecordView};

/// Buffers what the controller shows; `main` decides what reaches stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    pub selected: Option<String>,
    pub busy: bool,
    pub record_text: Option<String>,
    pub last_error: Option<String>,
    pub notices: Vec<String>,
}

impl DisplaySurface for TerminalSurface {
    fn show_drop_zone(&mut self) {
        self.selected = None;
    }

    fn show_selected_file(&mut self, name: &str, size_label: &str) {
        tracing::debug!(file = name, size = size_label, "file accepted");
        self.selected = Some(format!("{name} ({size_label})"));
    }

    fn set_submit_enabled(&mut self, _enabled: bool) {}

    fn set_busy(&mut self, busy: bool) {
        if busy {
            eprintln!("Parsing...");
        }
        self.busy = busy;
    }

    fn show_record(&mut self, view: &RecordView) {
        self.record_text = Some(view.to_string());
    }

    fn hide_record(&mut self) {
        self.record_text = None;
    }

    fn show_error(&mut self, message: &str) {
        self.last_error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.last_error = None;
    }

    fn show_success(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
