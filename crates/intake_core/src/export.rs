use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use shared::domain::ExtractedRecord;
use tracing::info;

use crate::error::IntakeError;

/// Destination for the "copy data" export.
pub trait ClipboardSink {
    fn set_text(&mut self, text: String) -> Result<(), String>;
}

pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("resume_data_{}.json", at.timestamp_millis())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

impl ExportArtifact {
    /// Pretty-prints with serde_json's default two-space indentation.
    pub fn from_record(record: &ExtractedRecord, at: DateTime<Utc>) -> Result<Self, IntakeError> {
        Ok(Self {
            file_name: export_file_name(at),
            contents: serde_json::to_string_pretty(record)?,
        })
    }

    pub fn write_into(&self, dir: &Path) -> Result<PathBuf, IntakeError> {
        let path = dir.join(&self.file_name);
        self.write_to(&path)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), IntakeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| IntakeError::ExportWrite {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        }
        fs::write(path, &self.contents).map_err(|err| IntakeError::ExportWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(path = %path.display(), bytes = self.contents.len(), "wrote extracted record export");
        Ok(())
    }
}
