use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::IntakeApp;

#[derive(Debug, Parser)]
#[command(name = "intake-gui", about = "Resume intake form")]
struct Args {
    /// Base URL of the parsing service.
    #[arg(long)]
    endpoint: Option<String>,
    /// Settings file; defaults to `intake.toml` in the working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Starting directory for the "Download JSON" save dialog.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings =
        intake_core::load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(dir) = args.export_dir {
        settings.export_dir = Some(dir);
    }
    tracing::info!(endpoint = %settings.endpoint, "starting intake GUI");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let app = IntakeApp::new(cmd_tx, ui_rx, &settings).context("invalid intake settings")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Resume Parser")
            .with_inner_size([820.0, 760.0])
            .with_min_inner_size([560.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native("Resume Parser", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("GUI exited with error: {err}"))
}
