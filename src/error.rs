//! Error types for the doc2md library.
//!
//! A single fatal error type covers every way a conversion can fail. There is
//! deliberately no "recoverable" variant at the document level: the core is a
//! pure transformation, so nothing inside it is worth retrying. When a batch
//! is processed, a failure aborts only the document that produced it —
//! [`crate::convert::convert_batch`] reports per-path results and keeps going.
//!
//! One failure mode is *not* represented here: a heading-map lookup miss
//! during rendering. That can only happen if the score tally and the resolver
//! disagree, which is a programming error, and it panics with a diagnostic
//! rather than surfacing as a recoverable `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the doc2md library.
#[derive(Debug, Error)]
pub enum Doc2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension (or `--format` override) names no known adapter.
    #[error(
        "Unsupported format '{extension}' for '{path}'\n\
         Supported: pdf, docx, pptx, html/xhtml/xml (Tika output).\n\
         Use --format to override detection."
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// The document could not be opened or parsed by its format adapter.
    #[error("Document '{path}' is corrupt or unreadable: {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// An adapter handed the core a fragment that violates the contract
    /// (non-finite score). Surfaced with the offending text for diagnosis.
    #[error("Malformed fragment from {format} adapter: {detail} (text: {text:?})")]
    MalformedFragment {
        format: &'static str,
        detail: String,
        text: String,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
         Set PDFIUM_LIB_PATH=/path/to/libpdfium, or install pdfium so it is\n\
         discoverable as a system library."
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
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

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
