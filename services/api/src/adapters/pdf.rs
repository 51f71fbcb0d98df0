//! services/api/src/adapters/pdf.rs
//!
//! Text extraction for uploaded PDF documents.

use crate::error::ApiError;

/// Extracts the plain text of an uploaded PDF. An unreadable or encrypted
/// document is a client error (the upload is rejected), not a server fault.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ApiError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ApiError::Parsing(format!("Could not read PDF file: {}", e)))?;

    if text.trim().is_empty() {
        return Err(ApiError::Parsing(
            "PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_parsing_error() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_)));
    }
}
