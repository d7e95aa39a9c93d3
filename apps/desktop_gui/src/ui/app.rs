use std::{path::PathBuf, time::Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use intake_core::{
    DisplaySurface, ExportAction, FieldSlot, IntakeController, IntakeError, IntakeSettings, RecordView,
    SectionView, SelectedFile,
};
use shared::domain::DocumentKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_health_failure, err_label, UiError, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::clipboard::SystemClipboard;
use crate::ui::form_view::{FormView, TOAST_LIFETIME};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);
const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);
const ERROR_STROKE: egui::Color32 = egui::Color32::from_rgb(175, 96, 96);
const SUCCESS_FILL: egui::Color32 = egui::Color32::from_rgb(36, 99, 62);

#[derive(Debug, Clone, PartialEq, Eq)]
enum ServiceStatus {
    Unknown,
    Checking,
    Healthy(String),
    Unreachable(String),
}

/// Collected while drawing, applied once the frame's widgets are laid out.
enum FormAction {
    Browse,
    Dropped(egui::DroppedFile),
    Reset,
    Parse,
    DownloadJson,
    CopyData,
    CheckHealth,
    DismissError,
}

pub struct IntakeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: IntakeController<FormView>,
    clipboard: SystemClipboard,
    export_dir: Option<PathBuf>,
    status: String,
    service_status: ServiceStatus,
}

impl IntakeApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &IntakeSettings,
    ) -> Result<Self, IntakeError> {
        let controller = IntakeController::new(FormView::default(), settings)?;
        let export_dir = settings.export_dir.clone().or_else(dirs::download_dir);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller,
            clipboard: SystemClipboard::default(),
            export_dir,
            status: "Starting...".to_string(),
            service_status: ServiceStatus::Unknown,
        };
        app.request_health_check();
        Ok(app)
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::ParseFinished { ticket, outcome } => {
                    match self.controller.complete_submit(ticket, outcome) {
                        Ok(Some(_)) => self.status = "Resume parsed".to_string(),
                        Ok(None) => {
                            self.status = "Discarded result for a replaced file".to_string()
                        }
                        Err(err) => {
                            let ui_error = UiError::from_intake(UiErrorContext::Upload, &err);
                            self.status = format!(
                                "{} error: {}",
                                err_label(ui_error.category()),
                                ui_error.message()
                            );
                        }
                    }
                }
                UiEvent::HealthChecked(result) => {
                    self.service_status = match result {
                        Ok(health) if health.is_healthy() => ServiceStatus::Healthy(health.status),
                        Ok(health) => ServiceStatus::Unreachable(format!(
                            "service reported status '{}'",
                            health.status
                        )),
                        Err(err) => ServiceStatus::Unreachable(classify_health_failure(
                            &err.to_string(),
                        )),
                    };
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    if err.context() == UiErrorContext::BackendStartup {
                        self.controller.surface_mut().show_error(err.message());
                        self.service_status = ServiceStatus::Unreachable(err.message().to_string());
                    }
                }
            }
        }
    }

    fn request_health_check(&mut self) {
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckHealth, &mut self.status) {
            self.service_status = ServiceStatus::Checking;
        }
    }

    fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::Browse => {
                let picked = rfd::FileDialog::new()
                    .set_title("Select a resume")
                    .add_filter("Resume (PDF, DOCX)", document_extensions().as_slice())
                    .pick_file();
                if let Some(path) = picked {
                    self.select_result(SelectedFile::from_path(path));
                }
            }
            FormAction::Dropped(file) => {
                if let Some(result) = selected_from_drop(&file) {
                    self.select_result(result);
                }
            }
            FormAction::Reset => {
                self.controller.reset();
                self.status = "Form cleared".to_string();
            }
            FormAction::Parse => self.start_parse(),
            FormAction::DownloadJson => self.download_json(),
            FormAction::CopyData => {
                if self.controller.export_to_clipboard(&mut self.clipboard).is_ok() {
                    self.status = "Copied extracted data".to_string();
                }
            }
            FormAction::CheckHealth => self.request_health_check(),
            FormAction::DismissError => self.controller.surface_mut().dismiss_error(),
        }
    }

    fn select_result(&mut self, result: Result<SelectedFile, IntakeError>) {
        let outcome = result.and_then(|file| {
            let name = file.name().to_string();
            self.controller.select(file).map(|()| name)
        });
        match outcome {
            Ok(name) => self.status = format!("Selected {name}"),
            Err(err) => {
                // select() already surfaced validation failures; read errors are ours to show.
                if matches!(err, IntakeError::FileRead { .. }) {
                    self.controller.surface_mut().show_error(&err.to_string());
                }
                self.status = format!("File rejected: {err}");
            }
        }
    }

    fn start_parse(&mut self) {
        let Ok((ticket, request)) = self.controller.begin_submit() else {
            return;
        };
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Upload { ticket, request },
            &mut self.status,
        );
        if queued {
            self.status = "Uploading to parsing service...".to_string();
        } else {
            let reason = self.status.clone();
            let _ = self
                .controller
                .complete_submit(ticket, Err(IntakeError::Transport(reason)));
        }
    }

    fn download_json(&mut self) {
        let Ok(artifact) = self.controller.prepare_export(ExportAction::Download) else {
            return;
        };
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save extracted data")
            .set_file_name(&artifact.file_name)
            .add_filter("JSON", &["json"]);
        if let Some(dir) = &self.export_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            if self.controller.save_export(&artifact, &path).is_ok() {
                self.status = format!("Saved {}", path.display());
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context, actions: &mut Vec<FormAction>) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::NONE
                    .fill(ctx.style().visuals.panel_fill)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.heading("Resume Parser");
                        ui.label(
                            egui::RichText::new(
                                "Upload a PDF or DOCX resume to extract structured information",
                            )
                            .weak(),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let checking = self.service_status == ServiceStatus::Checking;
                        if ui
                            .add_enabled(!checking, egui::Button::new("Check service"))
                            .clicked()
                        {
                            actions.push(FormAction::CheckHealth);
                        }
                        self.show_service_status(ui);
                    });
                });
            });
    }

    fn show_service_status(&self, ui: &mut egui::Ui) {
        match &self.service_status {
            ServiceStatus::Unknown => {
                ui.label(egui::RichText::new("Service: unknown").weak());
            }
            ServiceStatus::Checking => {
                ui.spinner();
                ui.label("Checking service...");
            }
            ServiceStatus::Healthy(status) => {
                ui.label(
                    egui::RichText::new(format!("Service: {status}"))
                        .color(egui::Color32::from_rgb(87, 242, 135)),
                );
            }
            ServiceStatus::Unreachable(reason) => {
                ui.label(egui::RichText::new("Service: unavailable").color(ERROR_STROKE))
                    .on_hover_text(reason);
            }
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status).small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(self.controller.endpoint()).small().weak());
                });
            });
        });
    }

    fn show_form(&self, ui: &mut egui::Ui, drag_hover: bool, actions: &mut Vec<FormAction>) {
        let view = self.controller.surface();

        if let Some(message) = &view.error {
            egui::Frame::NONE
                .fill(ERROR_FILL)
                .stroke(egui::Stroke::new(1.0, ERROR_STROKE))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                actions.push(FormAction::DismissError);
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }

        match &view.selected {
            None => show_drop_zone(ui, drag_hover, actions),
            Some(selected) => {
                egui::Frame::group(ui.style())
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&selected.name).strong());
                                ui.label(egui::RichText::new(&selected.size_label).weak());
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("Change file").clicked() {
                                        actions.push(FormAction::Reset);
                                    }
                                },
                            );
                        });
                    });
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let parse = egui::Button::new(
                egui::RichText::new("Parse Resume").color(egui::Color32::WHITE),
            )
            .fill(ACCENT);
            if ui
                .add_enabled(view.submit_enabled && !view.busy, parse)
                .clicked()
            {
                actions.push(FormAction::Parse);
            }
            if view.busy {
                ui.add(egui::Spinner::new());
                ui.label("Parsing...");
            }
        });

        if let Some(record) = &view.record {
            ui.add_space(16.0);
            ui.separator();
            if view.scroll_to_results {
                ui.scroll_to_cursor(Some(egui::Align::TOP));
            }
            show_results(ui, record, actions);
        }
    }

    fn show_toast(&self, ctx: &egui::Context) {
        let Some(toast) = &self.controller.surface().toast else {
            return;
        };
        egui::Area::new(egui::Id::new("intake_toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -40.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(SUCCESS_FILL)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&toast.message).color(egui::Color32::WHITE));
                    });
            });
    }
}

fn show_drop_zone(ui: &mut egui::Ui, drag_hover: bool, actions: &mut Vec<FormAction>) {
    let stroke = if drag_hover {
        egui::Stroke::new(2.0, ACCENT)
    } else {
        egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
    };
    let fill = if drag_hover {
        ACCENT.gamma_multiply(0.15)
    } else {
        ui.visuals().extreme_bg_color
    };

    let zone = egui::Frame::NONE
        .fill(fill)
        .stroke(stroke)
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(20, 28))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Drag & drop your resume here").size(18.0));
                ui.label(egui::RichText::new("or").weak());
                if ui.button("Browse Files").clicked() {
                    actions.push(FormAction::Browse);
                }
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("Supported formats: PDF, DOCX (Max 10MB)")
                        .small()
                        .weak(),
                );
            });
        });
    if zone
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
    {
        actions.push(FormAction::Browse);
    }
}

fn show_results(ui: &mut egui::Ui, record: &RecordView, actions: &mut Vec<FormAction>) {
    ui.horizontal(|ui| {
        ui.heading("Extracted Information");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Copy Data").clicked() {
                actions.push(FormAction::CopyData);
            }
            if ui.button("Download JSON").clicked() {
                actions.push(FormAction::DownloadJson);
            }
        });
    });
    ui.add_space(8.0);

    egui::Grid::new("contact_fields")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for (label, slot) in [
                ("Name", &record.name),
                ("Email", &record.email),
                ("Phone", &record.phone),
            ] {
                ui.label(egui::RichText::new(label).strong());
                field_label(ui, slot);
                ui.end_row();
            }
        });

    ui.add_space(12.0);
    ui.label(egui::RichText::new("Skills").strong());
    match &record.skills {
        SectionView::Items(skills) => {
            ui.horizontal_wrapped(|ui| {
                for skill in skills {
                    egui::Frame::NONE
                        .fill(ACCENT.gamma_multiply(0.25))
                        .corner_radius(10.0)
                        .inner_margin(egui::Margin::symmetric(8, 3))
                        .show(ui, |ui| {
                            ui.label(skill);
                        });
                }
            });
        }
        SectionView::Placeholder(text) => placeholder_label(ui, text),
    }

    for (title, section) in [
        ("Education", &record.education),
        ("Experience", &record.experience),
    ] {
        ui.add_space(12.0);
        ui.label(egui::RichText::new(title).strong());
        match section {
            SectionView::Items(items) => {
                for item in items {
                    egui::Frame::group(ui.style())
                        .corner_radius(6.0)
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.label(item);
                        });
                }
            }
            SectionView::Placeholder(text) => placeholder_label(ui, text),
        }
    }
}

fn field_label(ui: &mut egui::Ui, slot: &FieldSlot) {
    match slot {
        FieldSlot::Value(text) => {
            ui.label(text);
        }
        FieldSlot::Placeholder(text) => placeholder_label(ui, text),
    }
}

fn placeholder_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).italics().weak());
}

fn document_extensions() -> Vec<&'static str> {
    DocumentKind::ALL
        .into_iter()
        .map(DocumentKind::extension)
        .collect()
}

/// Native drops carry a path; web-style drops carry bytes. Drops with
/// neither are ignored.
fn selected_from_drop(file: &egui::DroppedFile) -> Option<Result<SelectedFile, IntakeError>> {
    if let Some(path) = &file.path {
        return Some(SelectedFile::from_path(path.clone()));
    }
    let bytes = file.bytes.clone()?;
    let mime = (!file.mime.is_empty()).then(|| file.mime.clone());
    Some(Ok(SelectedFile::from_bytes(file.name.clone(), bytes, mime)))
}

impl eframe::App for IntakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.controller
            .surface_mut()
            .expire_toast(Instant::now(), TOAST_LIFETIME);

        let drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());

        let mut actions = Vec::new();
        if let Some(file) = dropped {
            actions.push(FormAction::Dropped(file));
        }

        self.show_header(ctx, &mut actions);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.set_max_width(720.0);
                    self.show_form(ui, drag_hover, &mut actions);
                });
        });
        self.show_toast(ctx);
        self.controller.surface_mut().scroll_to_results = false;

        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn byte_drops_keep_browser_mime() {
        let drop = egui::DroppedFile {
            name: "cv.docx".to_string(),
            mime: shared::domain::DOCX_MIME.to_string(),
            bytes: Some(Arc::from(&b"docx"[..])),
            ..Default::default()
        };
        let file = selected_from_drop(&drop)
            .expect("bytes present")
            .expect("in-memory file");
        assert_eq!(file.name(), "cv.docx");
        assert_eq!(file.size_bytes(), 4);
        assert_eq!(file.mime_type(), Some(shared::domain::DOCX_MIME));
    }

    #[test]
    fn worker_startup_failure_ends_pending_health_check() {
        let (cmd_tx, _cmd_rx) = crossbeam_channel::bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = crossbeam_channel::bounded::<UiEvent>(4);
        let mut app = IntakeApp::new(cmd_tx, ui_rx, &IntakeSettings::default()).expect("app");
        assert_eq!(app.service_status, ServiceStatus::Checking);

        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "backend worker startup failure: failed to build runtime",
            )))
            .expect("send");
        app.process_ui_events();

        assert!(matches!(app.service_status, ServiceStatus::Unreachable(_)));
        assert!(app.controller.surface().error.is_some());
    }

    #[test]
    fn empty_drops_are_ignored() {
        assert!(selected_from_drop(&egui::DroppedFile::default()).is_none());
    }

    #[test]
    fn picker_filter_lists_accepted_extensions() {
        assert_eq!(document_extensions(), vec!["pdf", "docx"]);
    }
}
