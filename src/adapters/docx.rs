//! DOCX glue: paragraphs and tables from WordprocessingML.
//!
//! DOCX carries explicit paragraph style names (`Heading 1`, `Title`, …),
//! so no score inference is needed — a fixed style→prefix table decides the
//! heading level and everything unlisted renders as body text. Headers come
//! first, then the document body, then footers, matching how the parts are
//! stored in the package.
//!
//! The file itself is a zip; we stream `word/document.xml` (and the
//! `header*.xml` / `footer*.xml` parts) with quick-xml rather than loading
//! a full DOM.

use crate::adapters::{table_to_markdown, DirectDocument};
use crate::error::Doc2MdError;
use crate::pipeline::skip::should_skip;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use tracing::debug;

/// Paragraph style name → Markdown heading prefix. Styles not listed here
/// carry no heading signal and render as body text.
fn style_prefix(style: &str) -> &'static str {
    match style {
        "Title" | "title" | "Heading" | "Attribution" => "#",
        "Heading1" => "#",
        "Subtitle" | "Subheading" | "Heading2" => "##",
        "Heading3" | "Title 2" | "Header & Footer" => "###",
        "Heading4" => "####",
        "Heading5" => "#####",
        "Heading6" => "######",
        _ => "",
    }
}

/// Extract a DOCX file into Markdown lines.
pub fn extract(path: &Path, keep_noise: bool) -> Result<DirectDocument, Doc2MdError> {
    let file = File::open(path).map_err(|e| Doc2MdError::CorruptDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Doc2MdError::CorruptDocument {
        path: path.to_path_buf(),
        detail: format!("not a zip archive: {e}"),
    })?;

    // Part order: headers, body, footers.
    let mut part_names: Vec<String> = Vec::new();
    for i in 0..archive.len() {
        let name = archive
            .by_index(i)
            .map_err(|e| Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?
            .name()
            .to_string();
        if name.starts_with("word/header") && name.ends_with(".xml") {
            part_names.push(name);
        }
    }
    part_names.sort();
    part_names.push("word/document.xml".to_string());
    let mut footers: Vec<String> = Vec::new();
    for i in 0..archive.len() {
        if let Ok(entry) = archive.by_index(i) {
            let name = entry.name().to_string();
            if name.starts_with("word/footer") && name.ends_with(".xml") {
                footers.push(name);
            }
        }
    }
    footers.sort();
    part_names.extend(footers);

    let mut doc = DirectDocument::default();
    let mut lines = Vec::new();

    for part in &part_names {
        let mut entry = match archive.by_name(part) {
            Ok(e) => e,
            // Only the body part is mandatory.
            Err(_) if part != "word/document.xml" => continue,
            Err(e) => {
                return Err(Doc2MdError::CorruptDocument {
                    path: path.to_path_buf(),
                    detail: format!("missing {part}: {e}"),
                })
            }
        };
        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        parse_part(&xml, keep_noise, &mut lines, &mut doc.skipped_lines).map_err(|detail| {
            Doc2MdError::CorruptDocument {
                path: path.to_path_buf(),
                detail: format!("{part}: {detail}"),
            }
        })?;
    }

    debug!(
        "DOCX: {} parts, {} lines ({} skipped)",
        part_names.len(),
        lines.len(),
        doc.skipped_lines
    );
    doc.pages.push(lines);
    Ok(doc)
}

/// Stream one WordprocessingML part, appending Markdown lines.
fn parse_part(
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
    let mut para_style: Option<String> = None;

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
                        para_style = None;
                    }
                }
                b"pStyle" => {
                    if !in_table {
                        para_style = attr_val(e);
                    }
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"pStyle" => {
                    if !in_table {
                        para_style = attr_val(e);
                    }
                }
                b"tab" | b"br" => {
                    let target = if in_table { &mut cell } else { &mut para };
                    if !target.is_empty() && !target.ends_with(' ') {
                        target.push(' ');
                    }
                }
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
                        emit_paragraph(&para, para_style.as_deref(), keep_noise, lines, skipped);
                        para.clear();
                        para_style = None;
                    } else if !cell.is_empty() && !cell.ends_with(' ') {
                        // Paragraph break inside a cell reads as a space.
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

fn emit_paragraph(
    para: &str,
    style: Option<&str>,
    keep_noise: bool,
    lines: &mut Vec<String>,
    skipped: &mut usize,
) {
    let text = para.replace('\n', " ");
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !keep_noise && should_skip(text) {
        *skipped += 1;
        return;
    }
    let prefix = style.map(style_prefix).unwrap_or("");
    if prefix.is_empty() {
        lines.push(text.to_string());
    } else {
        lines.push(format!("{prefix} {text}"));
    }
}

/// The `w:val` attribute, ignoring namespace prefixes.
fn attr_val(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"val")
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> (Vec<String>, usize) {
        let mut lines = Vec::new();
        let mut skipped = 0;
        parse_part(xml, false, &mut lines, &mut skipped).unwrap();
        (lines, skipped)
    }

    #[test]
    fn heading_style_gets_prefix() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
                <w:r><w:t>Annual Report</w:t></w:r></w:p>
            <w:p><w:r><w:t>The year in review was eventful.</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (lines, _) = parse(xml);
        assert_eq!(
            lines,
            vec![
                "# Annual Report".to_string(),
                "The year in review was eventful.".to_string()
            ]
        );
    }

    #[test]
    fn unknown_style_is_body_text() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:pPr><w:pStyle w:val="FancyQuote"/></w:pPr>
                <w:r><w:t>Fortune favours the bold.</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines, vec!["Fortune favours the bold.".to_string()]);
    }

    #[test]
    fn runs_concatenate_within_paragraph() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:r><w:t>split </w:t></w:r><w:r><w:t>across runs</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines, vec!["split across runs".to_string()]);
    }

    #[test]
    fn noise_paragraph_skipped_and_counted() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:r><w:t>42</w:t></w:r></w:p>
            <w:p><w:r><w:t>Substantial paragraph content.</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (lines, skipped) = parse(xml);
        assert_eq!(lines, vec!["Substantial paragraph content.".to_string()]);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn table_renders_as_gfm() {
        let xml = r#"<w:document xmlns:w="ns"><w:body><w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>Role</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>Ada</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>Engineer</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl></w:body></w:document>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| Name"));
        assert!(lines[1].contains("---"));
        assert!(lines[2].starts_with("| Ada"));
    }

    #[test]
    fn empty_paragraphs_ignored() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p></w:p><w:p><w:r><w:t>   </w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (lines, skipped) = parse(xml);
        assert!(lines.is_empty());
        assert_eq!(skipped, 0);
    }
}
