use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{error::IntakeError, file::MAX_UPLOAD_BYTES};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
const DEFAULT_SETTINGS_FILE: &str = "intake";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntakeSettings {
    pub endpoint: String,
    pub max_upload_bytes: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            request_timeout_secs: None,
            export_dir: None,
        }
    }
}

/// Defaults, then `intake.{toml,json,...}` in the working directory (or
/// `file` when given), then `APP__*` variables, then the legacy
/// `INTAKE_ENDPOINT`.
pub fn load_settings(file: Option<&Path>) -> Result<IntakeSettings, IntakeError> {
    let defaults = IntakeSettings::default();
    let file_source = match file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let conf = Config::builder()
        .set_default("endpoint", defaults.endpoint)
        .and_then(|builder| builder.set_default("max_upload_bytes", defaults.max_upload_bytes))
        .map_err(|err| IntakeError::Settings(err.to_string()))?
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|err| IntakeError::Settings(err.to_string()))?;

    let mut settings: IntakeSettings = conf
        .try_deserialize()
        .map_err(|err| IntakeError::Settings(err.to_string()))?;

    if settings.max_upload_bytes > MAX_UPLOAD_BYTES {
        warn!(
            configured = settings.max_upload_bytes,
            limit = MAX_UPLOAD_BYTES,
            "max_upload_bytes above the service limit; clamping"
        );
        settings.max_upload_bytes = MAX_UPLOAD_BYTES;
    }

    if let Ok(v) = std::env::var("INTAKE_ENDPOINT") {
        if !v.trim().is_empty() {
            settings.endpoint = v;
        }
    }

    debug!(endpoint = %settings.endpoint, max_upload_bytes = settings.max_upload_bytes, "loaded intake settings");
    Ok(settings)
}
