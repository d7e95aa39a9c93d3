//! Worker side of the GUI: owns the tokio runtime and the HTTP transport.

pub mod commands;
pub mod runtime;
