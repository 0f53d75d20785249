//! Upload validation for publication files.
//!
//! Only PDFs are accepted. The declared content type must be `application/pdf`
//! and, when magic bytes identify the payload, they must agree.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::UploadedFile;

/// MIME type of accepted publication files.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type used for stored cover images.
pub const COVER_MIME: &str = "image/jpeg";

/// Reject empty, non-PDF, or path-traversing uploads.
pub fn validate_publication_upload(file: &UploadedFile) -> Result<()> {
    if file.bytes.is_empty() {
        return Err(Error::EmptyFile);
    }

    let declared = file
        .content_type
        .as_deref()
        .map(|c| c.split(';').next().unwrap_or(c).trim().to_lowercase());
    match declared.as_deref() {
        Some(PDF_MIME) => {}
        Some(other) => return Err(Error::UnsupportedType(other.to_string())),
        None => return Err(Error::UnsupportedType("unknown".to_string())),
    }

    if let Some(kind) = infer::get(&file.bytes) {
        if kind.mime_type() != PDF_MIME {
            debug!(
                declared = PDF_MIME,
                detected = kind.mime_type(),
                "Upload magic bytes contradict declared type"
            );
            return Err(Error::UnsupportedType(kind.mime_type().to_string()));
        }
    }

    if file.file_name.contains("..") {
        return Err(Error::InvalidInput(format!(
            "Invalid file name: {}",
            file.file_name
        )));
    }

    Ok(())
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    // Drop any path components
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "unnamed.pdf".to_string();
    }

    if sanitized.chars().count() > 255 {
        return sanitized.chars().take(255).collect();
    }

    sanitized.to_string()
}

/// Lower-cased extension including the dot, or empty when absent.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(".{}", ext.to_lowercase())
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_BYTES: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n";
    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn upload(name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(String::from),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_accepts_pdf() {
        assert!(validate_publication_upload(&upload("census.pdf", Some(PDF_MIME), PDF_BYTES)).is_ok());
    }

    #[test]
    fn test_accepts_pdf_with_parameters() {
        let file = upload("census.pdf", Some("application/PDF; charset=binary"), PDF_BYTES);
        assert!(validate_publication_upload(&file).is_ok());
    }

    #[test]
    fn test_rejects_empty_file() {
        let file = upload("census.pdf", Some(PDF_MIME), b"");
        assert!(matches!(validate_publication_upload(&file), Err(Error::EmptyFile)));
    }

    #[test]
    fn test_rejects_non_pdf_content_type() {
        let file = upload(
            "table.xlsx",
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            b"PK\x03\x04",
        );
        assert!(matches!(
            validate_publication_upload(&file),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_rejects_missing_content_type() {
        let file = upload("census.pdf", None, PDF_BYTES);
        assert!(matches!(
            validate_publication_upload(&file),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_rejects_mislabelled_png() {
        let file = upload("census.pdf", Some(PDF_MIME), PNG_BYTES);
        match validate_publication_upload(&file) {
            Err(Error::UnsupportedType(detected)) => assert_eq!(detected, "image/png"),
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_parent_directory_names() {
        let file = upload("../etc/census.pdf", Some(PDF_MIME), PDF_BYTES);
        assert!(matches!(
            validate_publication_upload(&file),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("dir/sub/report?.pdf"), "report_.pdf");
        assert_eq!(sanitize_filename("C:\\docs\\data.pdf"), "data.pdf");
        assert_eq!(sanitize_filename("   "), "unnamed.pdf");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Census.PDF"), ".pdf");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension(".hidden"), "");
    }
}
