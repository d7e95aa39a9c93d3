//! Backend-to-UI events and error modeling for the desktop GUI.

use intake_core::{ErrorKind, IntakeError, SubmissionTicket};
use shared::{domain::ExtractedRecord, protocol::HealthResponse};

pub enum UiEvent {
    Info(String),
    ParseFinished {
        ticket: SubmissionTicket,
        outcome: Result<ExtractedRecord, IntakeError>,
    },
    HealthChecked(Result<HealthResponse, IntakeError>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Server,
    Export,
    Configuration,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Upload,
    HealthCheck,
    General,
}

pub fn classify_health_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("error sending request")
    {
        "Parsing service unreachable; check the endpoint and that the service is running."
            .to_string()
    } else {
        format!("Parsing service health check failed: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid file")
            || message_lower.contains("exceeds")
            || message_lower.contains("select a file")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("endpoint")
            || message_lower.contains("settings")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_intake(context: UiErrorContext, err: &IntakeError) -> Self {
        let category = match (err.kind(), err) {
            (_, IntakeError::Server { .. }) => UiErrorCategory::Server,
            (ErrorKind::Validation, _) => UiErrorCategory::Validation,
            (ErrorKind::TransportOrServer, _) => UiErrorCategory::Transport,
            (ErrorKind::Export, _) => UiErrorCategory::Export,
            (ErrorKind::Configuration, _) => UiErrorCategory::Configuration,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Server => "Service",
        UiErrorCategory::Export => "Export",
        UiErrorCategory::Configuration => "Configuration",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
