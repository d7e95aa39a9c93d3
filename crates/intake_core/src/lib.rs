//! Resume intake controller: file validation, upload to the parsing
//! service, result projection and JSON export.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod file;
pub mod render;
pub mod transport;

pub use config::{load_settings, IntakeSettings};
pub use controller::{DisplaySurface, FormState, IntakeController, SubmissionTicket};
pub use error::{ErrorKind, ExportAction, IntakeError};
pub use export::{export_file_name, ClipboardSink, ExportArtifact};
pub use file::{human_readable_bytes, FileSource, SelectedFile, MAX_UPLOAD_BYTES};
pub use render::{render_record, FieldSlot, RecordView, SectionView};
pub use transport::{HttpParseTransport, ParseTransport, UploadRequest};
