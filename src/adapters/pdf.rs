//! PDF fragment extraction via pdfium.
//!
//! PDF has no paragraph or heading markup at all — just positioned glyph
//! runs — so this is the one adapter that feeds the score-inference
//! pipeline. Per character we take the on-page glyph font size (rounded to
//! the nearest point) as the typographic score, group characters into
//! visual lines by vertical-bounds overlap, and start a new block wherever
//! the vertical gap between lines clearly exceeds the line height. Block
//! boundaries are therefore decided here, in the adapter; the core never
//! invents them.
//!
//! ## Library binding
//!
//! pdfium is a runtime-loaded shared library. We bind, in order: the path
//! in `PDFIUM_LIB_PATH` (a file, or a directory containing the
//! platform-named library), then the system library. A failed binding is
//! fatal for PDF inputs only; the other adapters never touch pdfium.

use crate::error::Doc2MdError;
use crate::pipeline::layout::{BuiltDocument, DocumentBuilder, Fragment};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Minimum vertical overlap (as a fraction of the shorter band) for a
/// character to join the current visual line.
const MIN_LINE_OVERLAP: f32 = 0.5;

/// A vertical gap larger than this fraction of the current line height
/// starts a new block.
const BLOCK_GAP_FACTOR: f32 = 0.8;

/// Extract styled fragments from a PDF and build the document structure.
pub fn extract(path: &Path, keep_noise: bool) -> Result<BuiltDocument, Doc2MdError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| Doc2MdError::CorruptDocument {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut builder = DocumentBuilder::new(keep_noise);

    for page in pages.iter() {
        builder.begin_page();
        let text = match page.text() {
            Ok(t) => t,
            // Pages without a text layer (pure images) contribute nothing.
            Err(_) => continue,
        };
        extract_page(&text, &mut builder)?;
    }

    let built = builder.finish();
    debug!(
        "PDF structure: {} pages, {} blocks, {} lines ({} skipped)",
        built.pages.len(),
        built.block_count(),
        built.tally.total_lines(),
        built.skipped_lines
    );
    Ok(built)
}

/// Walk one page's characters, splitting fragments on score changes and
/// blocks on vertical gaps.
fn extract_page(text: &PdfPageText, builder: &mut DocumentBuilder) -> Result<(), Doc2MdError> {
    builder.begin_block();

    // Vertical band of the current visual line.
    let mut band: Option<(f32, f32)> = None;
    // Text accumulating toward the next fragment, with its score.
    let mut buf = String::new();
    let mut buf_score = 0i32;

    for ch in text.chars().iter() {
        let Some(c) = ch.unicode_char() else { continue };
        // Pdfium inserts its own line breaks, and whitespace glyphs often
        // carry degenerate bounds; neither may drive the geometry. Fold all
        // whitespace into single spaces inside the pending fragment.
        if c.is_whitespace() {
            if !buf.is_empty() && !buf.ends_with(' ') {
                buf.push(' ');
            }
            continue;
        }

        let score = char_score(&ch, c)?;
        let rect = ch
            .tight_bounds()
            .or_else(|_| ch.loose_bounds())
            .unwrap_or(PdfRect::ZERO);
        let top = rect.top().value;
        let bottom = rect.bottom().value;

        match band {
            None => band = Some((top, bottom)),
            Some((band_top, band_bottom)) => {
                if !same_visual_line(band_top, band_bottom, top, bottom) {
                    // Visual line break: close the pending fragment, and
                    // open a new block when the gap is clearly more than
                    // inter-line spacing.
                    flush_fragment(&mut buf, buf_score, builder);
                    let line_height = (band_top - band_bottom).max(0.01);
                    let gap = band_bottom - top;
                    if gap > BLOCK_GAP_FACTOR * line_height {
                        builder.begin_block();
                    }
                    band = Some((top, bottom));
                } else {
                    // Widen the band as the line accumulates.
                    band = Some((band_top.max(top), band_bottom.min(bottom)));
                }
            }
        }

        if !buf.is_empty() && score != buf_score {
            flush_fragment(&mut buf, buf_score, builder);
        }
        if buf.is_empty() {
            buf_score = score;
        }
        buf.push(c);
    }

    flush_fragment(&mut buf, buf_score, builder);
    Ok(())
}

/// Round the glyph font size to the typographic score, rejecting sizes the
/// adapter contract forbids.
fn char_score(ch: &PdfPageTextChar, c: char) -> Result<i32, Doc2MdError> {
    let size = ch.scaled_font_size().value;
    if !size.is_finite() {
        return Err(Doc2MdError::MalformedFragment {
            format: "pdf",
            detail: "glyph font size is not a finite number".into(),
            text: c.to_string(),
        });
    }
    Ok(size.round() as i32)
}

/// Two vertical bands belong to the same visual line when they overlap by
/// at least [`MIN_LINE_OVERLAP`] of the shorter band.
fn same_visual_line(band_top: f32, band_bottom: f32, top: f32, bottom: f32) -> bool {
    let overlap = band_top.min(top) - band_bottom.max(bottom);
    if overlap <= 0.0 {
        return false;
    }
    let band_height = (band_top - band_bottom).max(0.01);
    let char_height = (top - bottom).max(0.01);
    overlap / band_height.min(char_height) >= MIN_LINE_OVERLAP
}

fn flush_fragment(buf: &mut String, score: i32, builder: &mut DocumentBuilder) {
    if let Some(fragment) = Fragment::new(buf, score) {
        builder.push_fragment(fragment);
    }
    buf.clear();
}

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` override first, then the
/// system library.
fn bind_pdfium() -> Result<Pdfium, Doc2MdError> {
    if let Ok(var) = std::env::var("PDFIUM_LIB_PATH") {
        let pb = PathBuf::from(&var);
        let lib_path = if pb.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&pb)
        } else {
            pb
        };
        return Pdfium::bind_to_library(&lib_path)
            .map(Pdfium::new)
            .map_err(|e| Doc2MdError::PdfiumBindingFailed(format!("{e:?} (PDFIUM_LIB_PATH={var})")));
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| Doc2MdError::PdfiumBindingFailed(format!("{e:?}")))
}
