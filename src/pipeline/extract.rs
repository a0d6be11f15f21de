//! PDF text extraction via pdfium.
//!
//! pdfium is a C++ library with thread-local state, so all calls run inside
//! `tokio::task::spawn_blocking` and never on an async worker thread.
//!
//! Binding order: `PDFIUM_LIB_PATH`, then a library next to the current
//! working directory, then the system library.

use crate::error::StudyError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Text of a whole document plus a little bookkeeping.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// All page texts, in page order, separated by a newline.
    pub text: String,
    pub page_count: usize,
}

/// Extract the text of every page of `pdf_path`.
///
/// Fails with [`StudyError::EmptyExtraction`] when the document yields only
/// whitespace, which is what image-only scans produce.
pub async fn extract_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, StudyError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    let extracted = tokio::task::spawn_blocking(move || extract_text_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| StudyError::Internal(format!("Extraction task panicked: {}", e)))??;

    if extracted.text.trim().is_empty() {
        return Err(StudyError::EmptyExtraction {
            path: pdf_path.to_path_buf(),
        });
    }
    info!(
        "Extracted {} chars from {} pages",
        extracted.text.chars().count(),
        extracted.page_count
    );
    Ok(extracted)
}

fn bind_pdfium() -> Result<Pdfium, StudyError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(lib) => Pdfium::bind_to_library(PathBuf::from(lib)),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| StudyError::PdfiumBindingFailed(format!("{:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, StudyError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password, e))?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    debug!("PDF loaded: {} pages", page_count);

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page.text().map_err(|e| StudyError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("page {}: {:?}", idx + 1, e),
        })?;
        let content = page_text.all();
        debug!("Page {}: {} chars", idx + 1, content.len());
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&content);
    }

    Ok(ExtractedText { text, page_count })
}

fn load_error(pdf_path: &Path, password: Option<&str>, e: PdfiumError) -> StudyError {
    let detail = format!("{:?}", e);
    if detail.to_lowercase().contains("password") {
        if password.is_some() {
            StudyError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            StudyError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        StudyError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_errors_are_classified() {
        let path = Path::new("doc.pdf");
        let err = load_error(
            path,
            None,
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError),
        );
        assert!(matches!(err, StudyError::PasswordRequired { .. }));

        let err = load_error(
            path,
            Some("nope"),
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError),
        );
        assert!(matches!(err, StudyError::WrongPassword { .. }));
    }

    #[test]
    fn other_load_errors_are_corruption() {
        let err = load_error(
            Path::new("doc.pdf"),
            None,
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError),
        );
        assert!(matches!(err, StudyError::CorruptPdf { .. }));
    }
}
