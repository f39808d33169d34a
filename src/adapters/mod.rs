//! Format adapters: one per supported document format.
//!
//! An adapter's job is extraction, not inference. It opens the file with the
//! appropriate parser and either:
//!
//! * hands the core a stream of styled fragments within block boundaries
//!   (PDF — the only format where heading structure must be inferred from
//!   font sizes), or
//! * emits Markdown lines directly using a fixed style table (DOCX, PPTX,
//!   Tika HTML — these formats carry explicit style names or tags, so the
//!   score aggregator is never involved).
//!
//! Both paths run the same noise classifier and the same postprocess rules,
//! so output hygiene does not depend on the source format.

pub mod docx;
pub mod pdf;
pub mod pptx;
pub mod tika;

use crate::error::Doc2MdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The document formats doc2md can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Pdf,
    Docx,
    Pptx,
    /// XHTML as produced by Apache Tika's `xmlContent` extraction.
    #[serde(rename = "tika")]
    TikaHtml,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Pdf => "pdf",
            InputFormat::Docx => "docx",
            InputFormat::Pptx => "pptx",
            InputFormat::TikaHtml => "tika",
        };
        f.write_str(name)
    }
}

impl InputFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<InputFormat, Doc2MdError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(InputFormat::Pdf),
            "docx" => Ok(InputFormat::Docx),
            "pptx" => Ok(InputFormat::Pptx),
            "html" | "xhtml" | "xml" => Ok(InputFormat::TikaHtml),
            _ => Err(Doc2MdError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Markdown lines produced by a fixed-style-table adapter, grouped per page
/// (slide for PPTX, section for DOCX, whole document for Tika).
#[derive(Debug, Default)]
pub struct DirectDocument {
    pub pages: Vec<Vec<String>>,
    pub skipped_lines: usize,
}

impl DirectDocument {
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.len()).sum()
    }
}

/// Render rows of cell text as a GFM table, one Markdown line per row.
///
/// Cells are padded to the widest cell in their column so the raw Markdown
/// stays readable, and a separator row is inserted after the header. Ragged
/// rows are padded with empty cells to the widest row.
pub(crate) fn table_to_markdown(rows: &[Vec<String>]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let col_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut col_widths = vec![0usize; col_count];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }
    // A separator cell needs at least three dashes to parse as GFM.
    for w in &mut col_widths {
        *w = (*w).max(3);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (row_index, row) in rows.iter().enumerate() {
        if row_index == 1 {
            let sep = col_widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(format!("| {sep} |"));
        }
        let cells = (0..col_count)
            .map(|i| {
                let text = row.get(i).map(String::as_str).unwrap_or("");
                format!("{text:<width$}", width = col_widths[i])
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("| {cells} |"));
    }
    lines
}
