use super::traits::TextSource;
use super::ProcessingError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads uploads that already are plain UTF-8 text.
///
/// Binary documents (PDF, images) are rejected: turning those into text is
/// the job of an OCR / PDF `TextSource` implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn acquire(&self, bytes: &[u8], file_name: Option<&str>) -> Result<String, ProcessingError> {
        if let Some(format) = detect_binary_format(bytes) {
            return Err(ProcessingError::TextAcquisition(format!(
                "{} is a {format} document; plain text is required",
                file_name.unwrap_or("upload")
            )));
        }

        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        String::from_utf8(body.to_vec()).map_err(|e| {
            ProcessingError::TextAcquisition(format!("Report is not valid UTF-8 text: {e}"))
        })
    }
}

/// Detect common binary document formats from magic bytes.
pub fn detect_binary_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF-") {
        Some("PDF")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("JPEG")
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("PNG")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("WEBP")
    } else {
        None
    }
}
