//! UI layer for the desktop GUI: app shell, retained form view, clipboard.

pub mod app;
pub mod clipboard;
pub mod form_view;

pub use app::IntakeApp;
