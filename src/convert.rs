//! Conversion entry points.
//!
//! [`convert`] is the primary API: pick the adapter for the input format,
//! run the pipeline, return the assembled Markdown plus statistics.
//! [`convert_to_file`] persists the result next to the source (or wherever
//! the caller says), and [`convert_batch`] fans a list of documents out
//! across a thread pool, one document per task.

use crate::adapters::{docx, pdf, pptx, tika, DirectDocument, InputFormat};
use crate::config::ConversionConfig;
use crate::error::Doc2MdError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::headings::HeadingMap;
use crate::pipeline::{postprocess, render};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a single document to Markdown.
///
/// The input format comes from `config.format` when set, otherwise from the
/// file extension.
///
/// # Errors
/// - [`Doc2MdError::FileNotFound`] / [`Doc2MdError::PermissionDenied`] for
///   unreadable inputs
/// - [`Doc2MdError::UnsupportedFormat`] when the extension is not recognised
///   and no override was given
/// - [`Doc2MdError::CorruptDocument`] when the file cannot be parsed
/// - [`Doc2MdError::MalformedFragment`] when a parser hands the pipeline an
///   unusable fragment
pub fn convert(path: &Path, config: &ConversionConfig) -> Result<ConversionOutput, Doc2MdError> {
    let start = Instant::now();

    check_readable(path)?;
    let format = match config.format {
        Some(f) => f,
        None => InputFormat::from_path(path)?,
    };
    info!("Converting {} as {}", path.display(), format);

    let (markdown, mut stats) = match format {
        InputFormat::Pdf => convert_pdf(path, config)?,
        InputFormat::Docx => {
            let doc = docx::extract(path, config.keep_noise)?;
            (assemble_direct(&doc, config), direct_stats(&doc))
        }
        InputFormat::Pptx => {
            let doc = pptx::extract(path, config.keep_noise)?;
            (assemble_direct(&doc, config), direct_stats(&doc))
        }
        InputFormat::TikaHtml => {
            let doc = tika::extract(path, config.keep_noise)?;
            (assemble_direct(&doc, config), direct_stats(&doc))
        }
    };

    stats.duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        "{}: {} lines rendered, {} skipped, {}ms",
        path.display(),
        stats.lines,
        stats.skipped_lines,
        stats.duration_ms
    );

    Ok(ConversionOutput {
        markdown,
        format,
        stats,
    })
}

/// Convert a document and write the Markdown to `output`.
///
/// When `output` is `None` the result lands next to the source as
/// `<original filename>.md` (e.g. `report.pdf` → `report.pdf.md`). The file
/// is written to a temporary sibling first and renamed into place, so an
/// interrupted run never leaves a half-written `.md` behind.
pub fn convert_to_file(
    path: &Path,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionOutput), Doc2MdError> {
    let result = convert(path, config)?;

    let target = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(path),
    };

    let tmp = target.with_extension("md.tmp");
    let write = std::fs::write(&tmp, &result.markdown)
        .and_then(|()| std::fs::rename(&tmp, &target));
    if let Err(source) = write {
        let _ = std::fs::remove_file(&tmp);
        return Err(Doc2MdError::OutputWriteFailed {
            path: target,
            source,
        });
    }

    info!("Wrote {}", target.display());
    Ok((target, result))
}

/// Convert many documents in parallel.
///
/// Documents are independent, so each one runs on its own worker; a failure
/// in one never aborts the rest. Results come back in input order, one per
/// path.
pub fn convert_batch(
    paths: &[PathBuf],
    config: &ConversionConfig,
) -> Vec<(PathBuf, Result<ConversionOutput, Doc2MdError>)> {
    paths
        .par_iter()
        .map(|path| {
            let result = convert(path, config);
            if let Err(ref e) = result {
                warn!("{}: {}", path.display(), e);
            }
            (path.clone(), result)
        })
        .collect()
}

/// `report.pdf` → `report.pdf.md`, alongside the source.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".md");
    input.with_file_name(name)
}

fn check_readable(path: &Path) -> Result<(), Doc2MdError> {
    if !path.exists() {
        return Err(Doc2MdError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Doc2MdError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(Doc2MdError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// The score-inference path: extract styled fragments, rank font sizes,
/// render with inferred heading prefixes.
fn convert_pdf(
    path: &Path,
    config: &ConversionConfig,
) -> Result<(String, ConversionStats), Doc2MdError> {
    let built = pdf::extract(path, config.keep_noise)?;
    let map = HeadingMap::build(&built.tally, config.max_heading_depth);
    debug!(
        "Score tally: {} distinct scores over {} lines, body = {:?}",
        built.tally.distinct_scores().len(),
        built.tally.total_lines(),
        built.tally.dominant_score()
    );

    let markdown = render::render_document(&built.pages, &map, &config.page_separator);
    let markdown = postprocess::clean_markdown(&markdown);

    let stats = ConversionStats {
        pages: built.pages.len(),
        blocks: built.block_count(),
        lines: built.tally.total_lines(),
        skipped_lines: built.skipped_lines,
        distinct_scores: built.tally.distinct_scores().len(),
        body_score: built.tally.dominant_score(),
        duration_ms: 0,
    };
    Ok((markdown, stats))
}

/// Assemble pages of ready-made Markdown lines (the fixed-table formats).
fn assemble_direct(doc: &DirectDocument, config: &ConversionConfig) -> String {
    let mut out = String::new();
    let mut any_emitted = false;

    for (index, lines) in doc.pages.iter().enumerate() {
        if lines.is_empty() {
            continue;
        }
        if any_emitted {
            out.push_str(&config.page_separator.render(index + 1));
        }
        out.push_str(&lines.join("\n\n"));
        any_emitted = true;
    }

    postprocess::clean_markdown(&out)
}

fn direct_stats(doc: &DirectDocument) -> ConversionStats {
    ConversionStats {
        pages: doc.pages.len(),
        blocks: doc.pages.iter().filter(|p| !p.is_empty()).count(),
        lines: doc.line_count(),
        skipped_lines: doc.skipped_lines,
        distinct_scores: 0,
        body_score: None,
        duration_ms: 0,
    }
}
