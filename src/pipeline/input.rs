//! Input resolution: validate the user-supplied path before any work starts.
//!
//! Checking existence, read permission and the `%PDF` magic bytes up front
//! gives a precise error instead of an opaque pdfium failure later on.

use crate::error::StudyError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Clean up a path typed at the prompt: surrounding whitespace and the
/// quotes a file manager adds when a file is dragged into the terminal.
pub fn normalise_input(raw: &str) -> &str {
    let s = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    s
}

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_input(input: &str) -> Result<PathBuf, StudyError> {
    let cleaned = normalise_input(input);
    if cleaned.is_empty() {
        return Err(StudyError::InvalidInput {
            input: input.to_string(),
        });
    }
    let path = PathBuf::from(cleaned);

    if !path.is_file() {
        return Err(StudyError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(StudyError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(StudyError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(StudyError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// File stem used to name every artifact, e.g. `aula3` for `/x/aula3.pdf`.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "material".to_string())
}
