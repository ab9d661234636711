//! Resume upload intake: turns an uploaded file into a `ResumeInput`.
//!
//! PDFs and images are forwarded to the model as base64 attachments; every other
//! accepted type is decoded as text.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::models::profile::ResumeInput;

/// File extensions the resume step accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported resume file type: {0}")]
    UnsupportedType(String),

    #[error("Uploaded resume file is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub resume: ResumeInput,
}

/// Classifies an uploaded file. `content_type` falls back to a guess from the
/// extension when the client did not send one.
pub fn classify_upload(
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ResumeUpload, UploadError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedType(file_name.to_string()));
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    let mime_type = content_type
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .map(str::to_string)
        .unwrap_or_else(|| mime_for_extension(&extension).to_string());

    let resume = if is_binary(&mime_type) {
        ResumeInput::attachment(mime_type, general_purpose::STANDARD.encode(bytes))
    } else {
        ResumeInput::text(String::from_utf8_lossy(bytes).into_owned())
    };

    Ok(ResumeUpload {
        file_name: file_name.to_string(),
        resume,
    })
}

fn is_binary(mime_type: &str) -> bool {
    mime_type.contains("pdf") || mime_type.contains("image")
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "md" => "text/markdown",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_becomes_base64_attachment() {
        let upload = classify_upload("resume.pdf", Some("application/pdf"), b"%PDF-1.7").unwrap();
        assert_eq!(upload.file_name, "resume.pdf");
        assert_eq!(
            upload.resume,
            ResumeInput::attachment("application/pdf", "JVBERi0xLjc=")
        );
    }

    #[test]
    fn test_text_file_is_decoded() {
        let upload =
            classify_upload("resume.md", Some("text/markdown"), "# Jane Doe".as_bytes()).unwrap();
        assert_eq!(upload.resume, ResumeInput::text("# Jane Doe"));
    }

    #[test]
    fn test_missing_content_type_guessed_from_extension() {
        let upload = classify_upload("Photo.JPG", None, &[0xff, 0xd8, 0xff]).unwrap();
        match upload.resume {
            ResumeInput::Attachment { mime_type, .. } => assert_eq!(mime_type, "image/jpeg"),
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_octet_stream_is_treated_as_unknown() {
        let upload =
            classify_upload("notes.txt", Some("application/octet-stream"), b"hello").unwrap();
        assert_eq!(upload.resume, ResumeInput::text("hello"));
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = classify_upload("resume.docx", None, b"PK").unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType("resume.docx".to_string()));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert_eq!(
            classify_upload("resume.txt", None, b"").unwrap_err(),
            UploadError::Empty
        );
    }
}
