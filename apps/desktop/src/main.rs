mod terminal;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use intake_core::{
    load_settings, HttpParseTransport, IntakeController, IntakeSettings, ParseTransport,
    SelectedFile,
};
use tracing_subscriber::EnvFilter;

use terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(name = "intake", about = "Send resumes to the parsing service")]
struct Args {
    /// Base URL of the parsing service; overrides settings and environment.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Settings file; defaults to `intake.toml` in the working directory when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a PDF or DOCX resume and print the extracted record.
    Parse {
        file: PathBuf,
        /// Print the record as pretty JSON instead of labelled text.
        #[arg(long)]
        json: bool,
        /// Also write `resume_data_<millis>.json` into this directory.
        #[arg(long, value_name = "DIR")]
        save_json: Option<PathBuf>,
    },
    /// Ask the parsing service whether it is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    let transport = HttpParseTransport::new(&settings)?;

    match args.command {
        Command::Parse {
            file,
            json,
            save_json,
        } => parse(&settings, &transport, file, json, save_json).await,
        Command::Health => health(&transport).await,
    }
}

async fn parse(
    settings: &IntakeSettings,
    transport: &HttpParseTransport,
    path: PathBuf,
    json: bool,
    save_json: Option<PathBuf>,
) -> Result<()> {
    let mut controller = IntakeController::new(TerminalSurface::default(), settings)?;
    let file = SelectedFile::from_path(&path)?;
    if controller.select(file).is_err() {
        return Err(surface_error(&controller));
    }

    let outcome = controller
        .submit(transport)
        .await
        .map(|record| record.cloned());
    let record = match outcome {
        Ok(Some(record)) => record,
        Ok(None) => bail!("parse result was discarded"),
        Err(_) => return Err(surface_error(&controller)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else if let Some(text) = &controller.surface().record_text {
        if let Some(selected) = &controller.surface().selected {
            println!("File:  {selected}");
        }
        println!("{text}");
    }

    let export_dir = save_json.or_else(|| settings.export_dir.clone());
    if let Some(dir) = export_dir {
        let written = controller.export_to_dir(&dir);
        let written = written.map_err(|_| surface_error(&controller))?;
        for notice in &controller.surface().notices {
            eprintln!("{notice} ({})", written.display());
        }
    }
    Ok(())
}

async fn health(transport: &HttpParseTransport) -> Result<()> {
    let health = transport
        .health()
        .await
        .with_context(|| format!("parsing service at {} is unreachable", transport.endpoint()))?;
    println!("{}: {}", transport.endpoint(), health.status);
    if !health.is_healthy() {
        bail!("parsing service reported status '{}'", health.status);
    }
    Ok(())
}

fn surface_error(controller: &IntakeController<TerminalSurface>) -> anyhow::Error {
    match &controller.surface().last_error {
        Some(message) => anyhow!("{message}"),
        None => anyhow!("request failed"),
    }
}
