use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::TransportError;
use crate::models::ReportFormat;

/// A generated report ready to be written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    /// Exactly as supplied by the backend.
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Turns report content into file bytes: PDF content is base64, the text
    /// formats are taken as-is.
    pub fn from_report(
        format: ReportFormat,
        content: &str,
        filename: String,
    ) -> Result<Self, TransportError> {
        let bytes = if format.is_binary() {
            STANDARD
                .decode(content.trim())
                .map_err(|e| TransportError::Payload(format!("report is not valid base64: {}", e)))?
        } else {
            content.as_bytes().to_vec()
        };
        Ok(Self {
            filename,
            media_type: format.media_type(),
            bytes,
        })
    }

    /// Writes the report into `dir`, creating it if needed.
    ///
    /// The backend-supplied name must be a single plain file name; anything
    /// that would escape `dir` is refused rather than rewritten.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let mut components = Path::new(&self.filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => bail!("refusing to save report under name {:?}", self.filename),
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_is_base64_decoded() {
        let download =
            Download::from_report(ReportFormat::Pdf, "QUJD", "report.pdf".into()).unwrap();
        assert_eq!(download.bytes, b"ABC");
        assert_eq!(download.filename, "report.pdf");
        assert_eq!(download.media_type, "application/pdf");
    }

    #[test]
    fn test_text_formats_are_kept_raw() {
        let download =
            Download::from_report(ReportFormat::Markdown, "# Отчёт", "report.md".into()).unwrap();
        assert_eq!(download.bytes, "# Отчёт".as_bytes());
        assert_eq!(download.media_type, "text/markdown");

        let html = Download::from_report(ReportFormat::Html, "QUJD", "r.html".into()).unwrap();
        assert_eq!(html.bytes, b"QUJD");
        assert_eq!(html.media_type, "text/html");
    }

    #[test]
    fn test_invalid_base64_is_a_payload_error() {
        let err = Download::from_report(ReportFormat::Pdf, "not base64!", "r.pdf".into());
        assert!(matches!(err, Err(TransportError::Payload(_))));
    }

    #[test]
    fn test_save_writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download::from_report(ReportFormat::Pdf, "QUJD", "report.pdf".into()).unwrap();

        let path = download.save(&dir.path().join("reports")).unwrap();

        assert_eq!(path, dir.path().join("reports").join("report.pdf"));
        assert_eq!(fs::read(path).unwrap(), b"ABC");
    }

    #[test]
    fn test_save_refuses_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["../escape.pdf", "/etc/passwd", "a/b.pdf", ""] {
            let download = Download {
                filename: name.to_string(),
                media_type: "application/pdf",
                bytes: vec![],
            };
            assert!(download.save(dir.path()).is_err(), "{name} should be refused");
        }
    }
}
