//! The intake form controller.
//!
//! Owns the Selected File and the Extracted Record and drives an injected
//! [`DisplaySurface`]. All mutation happens through `&mut self`, so the
//! controller lives on whichever thread runs the UI; only
//! [`UploadRequest`]s leave it.
//!
//! Submitting is split in two so a front-end can hand the network call to a
//! worker: [`IntakeController::begin_submit`] checks the gate and packages
//! the request, [`IntakeController::complete_submit`] settles it.
//! [`IntakeController::submit`] runs both around an awaited transport call.

use std::path::{Path, PathBuf};

use chrono::Utc;
use shared::domain::ExtractedRecord;
use tracing::{debug, info, warn};

use crate::{
    config::IntakeSettings,
    error::{ExportAction, IntakeError},
    export::{ClipboardSink, ExportArtifact},
    file::{SelectedFile, MAX_UPLOAD_BYTES},
    render::{render_record, RecordView},
    transport::{normalize_endpoint, ParseTransport, UploadRequest},
};

pub const DOWNLOAD_SUCCESS: &str = "JSON file downloaded successfully!";
pub const COPY_SUCCESS: &str = "Data copied to clipboard!";

/// Whatever the controller draws on: a window, a terminal, a test recorder.
pub trait DisplaySurface {
    /// Pre-selection state: the drop zone is visible, no file details.
    fn show_drop_zone(&mut self);
    fn show_selected_file(&mut self, name: &str, size_label: &str);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_busy(&mut self, busy: bool);
    fn show_record(&mut self, view: &RecordView);
    fn hide_record(&mut self);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    fn show_success(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Ready,
    Submitting,
}

/// Identifies one submission; outcomes carrying a stale ticket settle the
/// in-flight gate but never install a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    selection: u64,
    sequence: u64,
}

pub struct IntakeController<D: DisplaySurface> {
    surface: D,
    endpoint: String,
    max_upload_bytes: u64,
    selected: Option<SelectedFile>,
    record: Option<ExtractedRecord>,
    in_flight: Option<SubmissionTicket>,
    selection_generation: u64,
    submit_sequence: u64,
}

impl<D: DisplaySurface> IntakeController<D> {
    pub fn new(surface: D, settings: &IntakeSettings) -> Result<Self, IntakeError> {
        let endpoint = normalize_endpoint(&settings.endpoint)?;
        let mut controller = Self {
            surface,
            endpoint,
            max_upload_bytes: settings.max_upload_bytes.min(MAX_UPLOAD_BYTES),
            selected: None,
            record: None,
            in_flight: None,
            selection_generation: 0,
            submit_sequence: 0,
        };
        controller.surface.show_drop_zone();
        controller.surface.set_submit_enabled(false);
        controller.surface.set_busy(false);
        Ok(controller)
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn record(&self) -> Option<&ExtractedRecord> {
        self.record.as_ref()
    }

    pub fn state(&self) -> FormState {
        match (&self.selected, &self.in_flight) {
            (_, Some(_)) => FormState::Submitting,
            (Some(_), None) => FormState::Ready,
            (None, None) => FormState::Idle,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.in_flight.is_none()
    }

    pub fn select(&mut self, file: SelectedFile) -> Result<(), IntakeError> {
        self.surface.hide_error();
        if let Err(err) = file.validate(self.max_upload_bytes) {
            warn!(file = file.name(), size_bytes = file.size_bytes(), error = %err, "rejected candidate file");
            self.surface.show_error(&err.to_string());
            return Err(err);
        }

        info!(file = file.name(), size_bytes = file.size_bytes(), "selected file");
        self.surface
            .show_selected_file(file.name(), &file.size_label());
        self.selected = Some(file);
        self.selection_generation += 1;
        self.record = None;
        self.surface.hide_record();
        self.surface.set_submit_enabled(self.can_submit());
        Ok(())
    }

    pub fn reset(&mut self) {
        debug!("resetting intake form");
        self.selected = None;
        self.selection_generation += 1;
        self.record = None;
        self.surface.show_drop_zone();
        self.surface.hide_record();
        self.surface.hide_error();
        self.surface.set_submit_enabled(false);
    }

    pub fn begin_submit(&mut self) -> Result<(SubmissionTicket, UploadRequest), IntakeError> {
        let Some(file) = self.selected.clone() else {
            let err = IntakeError::NoFileSelected;
            self.surface.show_error(&err.to_string());
            return Err(err);
        };
        if self.in_flight.is_some() {
            return Err(IntakeError::SubmissionInFlight);
        }

        self.submit_sequence += 1;
        let ticket = SubmissionTicket {
            selection: self.selection_generation,
            sequence: self.submit_sequence,
        };
        self.in_flight = Some(ticket);
        self.surface.hide_error();
        self.surface.set_busy(true);
        self.surface.set_submit_enabled(false);
        info!(file = file.name(), endpoint = %self.endpoint, "submitting file for parsing");
        Ok((ticket, UploadRequest { file }))
    }

    /// Settles a submission. The in-flight gate is always released, whatever
    /// the outcome.
    pub fn complete_submit(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<ExtractedRecord, IntakeError>,
    ) -> Result<Option<&ExtractedRecord>, IntakeError> {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        } else {
            warn!(?ticket, "settling a submission that is not in flight");
        }
        self.surface.set_busy(false);
        self.surface.set_submit_enabled(self.can_submit());

        let stale = ticket.selection != self.selection_generation;
        let record = match outcome {
            Ok(record) => record,
            Err(err) if stale => {
                warn!(error = %err, "parse request for a replaced file failed");
                return Err(err);
            }
            Err(err) => {
                warn!(error = %err, "parse request failed");
                let message = self.failure_message(&err);
                self.surface.show_error(&message);
                return Err(err);
            }
        };

        if stale {
            info!("discarding parse result for a file that is no longer selected");
            return Ok(None);
        }

        self.render(&record);
        self.record = Some(record);
        Ok(self.record.as_ref())
    }

    pub async fn submit<T>(&mut self, transport: &T) -> Result<Option<&ExtractedRecord>, IntakeError>
    where
        T: ParseTransport + ?Sized,
    {
        let (ticket, request) = self.begin_submit()?;
        let outcome = transport
            .upload(request)
            .await
            .map(|response| response.extracted_data);
        self.complete_submit(ticket, outcome)
    }

    pub fn render(&mut self, record: &ExtractedRecord) {
        let view = render_record(record);
        self.surface.show_record(&view);
    }

    /// Builds the export without delivering it; front-ends with their own
    /// save dialog follow up with [`Self::save_export`].
    pub fn prepare_export(&mut self, action: ExportAction) -> Result<ExportArtifact, IntakeError> {
        let result = match &self.record {
            Some(record) => ExportArtifact::from_record(record, Utc::now()),
            None => Err(IntakeError::NoRecord(action)),
        };
        if let Err(err) = &result {
            self.surface.show_error(&err.to_string());
        }
        result
    }

    pub fn save_export(&mut self, artifact: &ExportArtifact, path: &Path) -> Result<(), IntakeError> {
        match artifact.write_to(path) {
            Ok(()) => {
                self.surface.show_success(DOWNLOAD_SUCCESS);
                Ok(())
            }
            Err(err) => {
                self.surface.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf, IntakeError> {
        let artifact = self.prepare_export(ExportAction::Download)?;
        match artifact.write_into(dir) {
            Ok(path) => {
                self.surface.show_success(DOWNLOAD_SUCCESS);
                Ok(path)
            }
            Err(err) => {
                self.surface.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn export_to_clipboard<C>(&mut self, clipboard: &mut C) -> Result<(), IntakeError>
    where
        C: ClipboardSink + ?Sized,
    {
        let artifact = self.prepare_export(ExportAction::Copy)?;
        match clipboard.set_text(artifact.contents) {
            Ok(()) => {
                self.surface.show_success(COPY_SUCCESS);
                Ok(())
            }
            Err(reason) => {
                let err = IntakeError::Clipboard(reason);
                self.surface.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    fn failure_message(&self, err: &IntakeError) -> String {
        match err {
            IntakeError::Transport(reason) => format!(
                "Error: {reason}. Make sure the parsing service is running at {}",
                self.endpoint
            ),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
