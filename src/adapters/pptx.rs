//! PPTX glue: slide text and tables from DrawingML.
//!
//! Slides carry no usable typographic hierarchy, so every paragraph renders
//! as body text under a `Slide N` marker heading. Tables (`a:tbl`) render as
//! GFM tables like the other formats.

use crate::adapters::{table_to_markdown, DirectDocument};
use crate::error::Doc2MdError;
use crate::pipeline::skip::should_skip;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use tracing::debug;

/// Extract a PPTX file into Markdown lines, one page per slide.
pub fn extract(path: &Path, keep_noise: bool) -> Result<DirectDocument, Doc2MdError> {
    let file = File::open(path).map_err(|e| Doc2MdError::CorruptDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Doc2MdError::CorruptDocument {
        path: path.to_path_buf(),
        detail: format!("not a zip archive: {e}"),
    })?;

    // ppt/slides/slide12.xml sorts after slide2.xml lexically, so order by
    // the embedded index instead.
    let mut slides: Vec<(usize, String)> = Vec::new();
    for i in 0..archive.len() {
        let name = archive
            .by_index(i)
            .map_err(|e| Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?
            .name()
            .to_string();
        if let Some(idx) = slide_index(&name) {
            slides.push((idx, name));
        }
    }
    slides.sort();

    if slides.is_empty() {
        return Err(Doc2MdError::CorruptDocument {
            path: path.to_path_buf(),
            detail: "no slides found under ppt/slides/".to_string(),
        });
    }

    let mut doc = DirectDocument::default();
    for (idx, name) in &slides {
        let mut entry = archive
            .by_name(name)
            .map_err(|e| Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let mut lines = vec![format!("## Slide {idx}")];
        parse_slide(&xml, keep_noise, &mut lines, &mut doc.skipped_lines).map_err(|detail| {
            Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: format!("{name}: {detail}"),
            }
        })?;
        doc.pages.push(lines);
    }

    debug!(
        "PPTX: {} slides, {} lines ({} skipped)",
        slides.len(),
        doc.line_count(),
        doc.skipped_lines
    );
    Ok(doc)
}

/// `ppt/slides/slide7.xml` → `Some(7)`.
fn slide_index(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Stream one slide part, appending Markdown lines.
fn parse_slide(
    xml: &str,
    keep_noise: bool,
    lines: &mut Vec<String>,
    skipped: &mut usize,
) -> Result<(), String> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_text = false;
    let mut in_table = false;
    let mut para = String::new();

    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut table_rows: Vec<Vec<String>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"tbl" => {
                    in_table = true;
                    table_rows.clear();
                }
                b"tr" if in_table => row.clear(),
                b"tc" if in_table => cell.clear(),
                b"p" => {
                    if !in_table {
                        para.clear();
                    }
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e.unescape().map_err(|err| err.to_string())?;
                    if in_table {
                        cell.push_str(&text);
                    } else {
                        para.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !in_table {
                        let text = para.replace('\n', " ");
                        let text = text.trim();
                        if !text.is_empty() {
                            if !keep_noise && should_skip(text) {
                                *skipped += 1;
                            } else {
                                lines.push(text.to_string());
                            }
                        }
                        para.clear();
                    } else if !cell.is_empty() && !cell.ends_with(' ') {
                        cell.push(' ');
                    }
                }
                b"tc" if in_table => row.push(cell.trim().to_string()),
                b"tr" if in_table => {
                    if !row.is_empty() {
                        table_rows.push(std::mem::take(&mut row));
                    }
                }
                b"tbl" => {
                    in_table = false;
                    lines.extend(table_to_markdown(&table_rows));
                    table_rows.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
