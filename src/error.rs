//! Error type for the pdf2study library.
//!
//! Every failure in a run is fatal: there is no per-page or per-question
//! partial success, so a single [`StudyError`] enum covers the whole
//! pipeline. Variants are grouped by the stage that raises them so the CLI
//! can print a one-line diagnostic that points at the right place.
//!
//! Files written before a failure are left on disk; nothing is rolled back.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2study library.
#[derive(Debug, Error)]
pub enum StudyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is empty or otherwise unusable as a path.
    #[error("Invalid input '{input}': expected a path to a PDF file")]
    InvalidInput { input: String },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The PDF opened fine but carries no extractable text.
    #[error("No text could be extracted from '{path}' (it may be a scanned, image-only PDF)")]
    EmptyExtraction { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library next to the\n\
binary, or install it system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Generation errors ─────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error. Never retried.
    #[error("LLM API error during {stage}: {message}")]
    LlmApiError { stage: String, message: String },

    /// The LLM call did not answer within `api_timeout_secs`.
    #[error("LLM call for {stage} timed out after {secs}s")]
    ApiTimeout { stage: String, secs: u64 },

    /// The LLM answered with nothing but whitespace.
    #[error("LLM returned an empty {stage}")]
    EmptyGeneration { stage: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The document renderer reported a failure.
    #[error("Report rendering failed ({renderer}): {detail}")]
    RenderFailed { renderer: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the run output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write one of the output files.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── User ──────────────────────────────────────────────────────────────
    /// The user cancelled the run (Ctrl-C).
    #[error("Operation cancelled by the user")]
    Interrupted,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudyError {
    /// `true` for a user cancellation, which the CLI reports differently
    /// from every other failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, StudyError::Interrupted)
    }
}
