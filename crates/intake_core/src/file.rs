//! The Selected File: where its bytes come from and whether it may be uploaded.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::domain::DocumentKind;
use tracing::warn;

use crate::error::IntakeError;

/// Upload ceiling enforced before any network traffic (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Read lazily at submit time.
    Path(PathBuf),
    /// Already in memory, e.g. a drag-and-drop payload without a backing path.
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: Option<String>,
    size_bytes: u64,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, IntakeError> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|err| IntakeError::FileRead {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(IntakeError::FileRead {
                path,
                reason: "not a regular file".to_string(),
            });
        }

        Ok(Self {
            name: display_name(&path),
            mime_type: guess_mime(&path),
            size_bytes: metadata.len(),
            source: FileSource::Path(path),
        })
    }

    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        mime_type: Option<String>,
    ) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let mime_type = mime_type
            .filter(|mime| !mime.trim().is_empty())
            .or_else(|| guess_mime(Path::new(&name)));
        Self {
            size_bytes: bytes.len() as u64,
            name,
            mime_type,
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn size_label(&self) -> String {
        human_readable_bytes(self.size_bytes)
    }

    /// Declared MIME type wins; the extension is the fallback.
    pub fn document_kind(&self) -> Option<DocumentKind> {
        self.mime_type
            .as_deref()
            .and_then(DocumentKind::from_mime)
            .or_else(|| DocumentKind::from_file_name(&self.name))
    }

    /// Type is checked before size, so an oversized `.txt` reports the type problem.
    pub fn validate(&self, max_bytes: u64) -> Result<DocumentKind, IntakeError> {
        let kind = self
            .document_kind()
            .ok_or_else(|| IntakeError::UnsupportedFileType {
                file_name: self.name.clone(),
            })?;

        if self.size_bytes > max_bytes {
            return Err(too_large(self.size_bytes, max_bytes));
        }

        Ok(kind)
    }

    /// MIME type sent with the multipart part.
    pub fn upload_mime(&self) -> &str {
        match (self.mime_type.as_deref(), self.document_kind()) {
            (Some(mime), Some(kind)) if DocumentKind::from_mime(mime) == Some(kind) => mime,
            (_, Some(kind)) => kind.mime_type(),
            (Some(mime), None) => mime,
            (None, None) => FALLBACK_MIME,
        }
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, IntakeError> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
            FileSource::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|err| IntakeError::FileRead {
                        path: path.clone(),
                        reason: err.to_string(),
                    })?;
                // The file may have changed on disk since it was selected.
                let len = bytes.len() as u64;
                if len > MAX_UPLOAD_BYTES {
                    warn!(file = %self.name, selected_bytes = self.size_bytes, read_bytes = len, "file grew past the upload limit after selection");
                    return Err(too_large(len, MAX_UPLOAD_BYTES));
                }
                Ok(bytes)
            }
        }
    }
}

fn too_large(size_bytes: u64, max_bytes: u64) -> IntakeError {
    IntakeError::FileTooLarge {
        size_bytes,
        limit_label: human_readable_bytes(max_bytes).replace(' ', ""),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{DOCX_MIME, PDF_MIME};

    fn sized(name: &str, mime: Option<&str>, size: usize) -> SelectedFile {
        SelectedFile::from_bytes(name, vec![0u8; size], mime.map(str::to_string))
    }

    #[test]
    fn formats_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(MAX_UPLOAD_BYTES), "10 MB");
    }

    #[test]
    fn accepts_pdf_and_docx_by_extension() {
        assert_eq!(
            sized("resume.pdf", None, 10).validate(MAX_UPLOAD_BYTES).ok(),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            sized("resume.DOCX", None, 10).validate(MAX_UPLOAD_BYTES).ok(),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn accepts_matching_mime_even_without_known_extension() {
        let file = sized("download", Some(PDF_MIME), 10);
        assert_eq!(file.validate(MAX_UPLOAD_BYTES).ok(), Some(DocumentKind::Pdf));
        assert_eq!(file.upload_mime(), PDF_MIME);
    }

    #[test]
    fn rejects_unknown_type_and_reports_type_before_size() {
        let err = sized("notes.txt", Some("text/plain"), 11 * 1024 * 1024)
            .validate(MAX_UPLOAD_BYTES)
            .expect_err("must reject");
        assert!(matches!(err, IntakeError::UnsupportedFileType { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid file type. Please upload a PDF or DOCX file."
        );
    }

    #[test]
    fn rejects_oversized_documents() {
        let limit = MAX_UPLOAD_BYTES as usize;
        assert!(sized("cv.pdf", None, limit).validate(MAX_UPLOAD_BYTES).is_ok());
        let err = sized("cv.pdf", None, limit + 1)
            .validate(MAX_UPLOAD_BYTES)
            .expect_err("must reject");
        assert_eq!(
            err.to_string(),
            "File size exceeds 10MB. Please upload a smaller file."
        );
    }

    #[test]
    fn guesses_docx_mime_from_name() {
        let file = sized("cv.docx", None, 1);
        assert_eq!(file.mime_type(), Some(DOCX_MIME));
        assert_eq!(file.upload_mime(), DOCX_MIME);
    }

    #[test]
    fn unknown_declared_mime_defers_to_extension_for_upload() {
        let file = sized("cv.pdf", Some("application/x-unknown"), 1);
        assert_eq!(file.upload_mime(), PDF_MIME);
    }

    #[test]
    fn reads_metadata_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resume.pdf");
        fs::write(&path, b"%PDF-1.7 test").expect("write");

        let file = SelectedFile::from_path(&path).expect("selected");
        assert_eq!(file.name(), "resume.pdf");
        assert_eq!(file.size_bytes(), 13);
        assert_eq!(file.mime_type(), Some(PDF_MIME));
        assert_eq!(file.source(), &FileSource::Path(path));
    }

    #[tokio::test]
    async fn file_grown_past_limit_after_selection_is_not_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cv.pdf");
        fs::write(&path, b"%PDF-").expect("write");
        let file = SelectedFile::from_path(&path).expect("selected");
        assert!(file.validate(MAX_UPLOAD_BYTES).is_ok());

        fs::write(&path, vec![0u8; MAX_UPLOAD_BYTES as usize + 10]).expect("grow");

        let err = file.read_bytes().await.expect_err("over the limit");
        match err {
            IntakeError::FileTooLarge { size_bytes, .. } => {
                assert_eq!(size_bytes, MAX_UPLOAD_BYTES + 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_path_is_a_read_error() {
        let err = SelectedFile::from_path("/definitely/not/here/resume.pdf").expect_err("missing");
        assert!(matches!(err, IntakeError::FileRead { .. }));
    }
}
