//! # doc2md
//!
//! Convert richly-styled documents (PDF, DOCX, PPTX, Tika XHTML) to clean
//! Markdown by inferring structure from typography.
//!
//! ## Why this crate?
//!
//! None of these formats expose a first-class "this is a heading" flag. PDFs
//! in particular only carry glyphs with positions and font sizes. Instead of
//! guessing per line, this crate tallies the font sizes used across the
//! whole document: the most frequent size is body text, and the larger,
//! rarer sizes become `#`, `##`, `###`, … in descending order. Page numbers,
//! bare figures, and stray short tokens are filtered out by a small noise
//! classifier before they can skew the tally.
//!
//! DOCX, PPTX, and Tika XHTML already carry explicit structure (style names,
//! slide boundaries, `h1`..`h6` tags), so those adapters map it directly to
//! Markdown and bypass the score inference entirely.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   glyphs → scored fragments, grouped into lines and blocks
//!  ├─ 2. Filter    noise classifier drops page numbers / bare figures
//!  ├─ 3. Tally     count surviving lines per font size
//!  ├─ 4. Rank      most frequent size = body, larger sizes = # / ## / …
//!  ├─ 5. Render    prefix each line, join with paragraph spacing
//!  └─ 6. Polish    whitespace and invisible-character cleanup
//!
//! DOCX / PPTX / Tika XHTML
//!  │
//!  ├─ 1. Extract   style names / slides / heading tags → Markdown lines
//!  ├─ 2. Filter    same noise classifier
//!  └─ 3. Polish    same cleanup
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2md::{convert, ConversionConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert(Path::new("report.pdf"), &config)?;
//!     println!("{}", output.markdown);
//!     eprintln!(
//!         "{} lines rendered, {} filtered as noise",
//!         output.stats.lines, output.stats.skipped_lines
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2md` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! doc2md = { version = "0.3", default-features = false }
//! ```
//!
//! PDF extraction needs a pdfium shared library at runtime; point
//! `PDFIUM_LIB_PATH` at it (file or containing directory) or install it
//! where the system loader finds it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod adapters;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use adapters::InputFormat;
pub use config::{ConversionConfig, ConversionConfigBuilder, PageSeparator};
pub use convert::{convert, convert_batch, convert_to_file};
pub use error::Doc2MdError;
pub use output::{ConversionOutput, ConversionStats};
