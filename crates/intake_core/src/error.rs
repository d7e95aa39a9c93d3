use std::{fmt, path::PathBuf};

use thiserror::Error;

pub const GENERIC_PARSE_FAILURE: &str = "Failed to parse resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    Download,
    Copy,
}

impl fmt::Display for ExportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download => f.write_str("download"),
            Self::Copy => f.write_str("copy"),
        }
    }
}

/// Coarse grouping used by front-ends to pick how an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    TransportOrServer,
    Export,
    Configuration,
}

/// Every failure the intake controller can report. None of them are fatal;
/// retrying the action that produced one is always allowed.
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    #[error("Invalid file type. Please upload a PDF or DOCX file.")]
    UnsupportedFileType { file_name: String },
    #[error("File size exceeds {limit_label}. Please upload a smaller file.")]
    FileTooLarge { size_bytes: u64, limit_label: String },
    #[error("Please select a file first.")]
    NoFileSelected,
    #[error("A parse request is already in progress.")]
    SubmissionInFlight,
    #[error("could not read '{}': {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("No data to {0}")]
    NoRecord(ExportAction),
    #[error("Failed to copy data: {0}")]
    Clipboard(String),
    #[error("Failed to save JSON file '{}': {reason}", path.display())]
    ExportWrite { path: PathBuf, reason: String },
    #[error("failed to serialize extracted record: {0}")]
    Serialize(String),
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl IntakeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFileType { .. }
            | Self::FileTooLarge { .. }
            | Self::NoFileSelected
            | Self::SubmissionInFlight => ErrorKind::Validation,
            Self::FileRead { .. } | Self::Server { .. } | Self::Transport(_) => {
                ErrorKind::TransportOrServer
            }
            Self::NoRecord(_)
            | Self::Clipboard(_)
            | Self::ExportWrite { .. }
            | Self::Serialize(_) => ErrorKind::Export,
            Self::InvalidEndpoint { .. } | Self::Settings(_) => ErrorKind::Configuration,
        }
    }

    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self::Server {
            status,
            message: detail.unwrap_or_else(|| GENERIC_PARSE_FAILURE.to_string()),
        }
    }
}

impl From<reqwest::Error> for IntakeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
