//! Tika XHTML glue.
//!
//! Apache Tika's `xmlContent` extraction wraps document text in XHTML with
//! `h1`..`h6` when the source format exposes heading levels, so the cleaning
//! pass here only has to map those tags to `#` prefixes and flatten
//! everything else to body text. The `<head>` block (Tika metadata) is
//! dropped wholesale.

use crate::adapters::DirectDocument;
use crate::error::Doc2MdError;
use crate::pipeline::skip::should_skip;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;
use tracing::debug;

/// Extract a Tika XHTML file into Markdown lines.
pub fn extract(path: &Path, keep_noise: bool) -> Result<DirectDocument, Doc2MdError> {
    let xml = std::fs::read_to_string(path).map_err(|e| Doc2MdError::CorruptDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut doc = DirectDocument::default();
    let mut lines = Vec::new();
    parse_xhtml(&xml, keep_noise, &mut lines, &mut doc.skipped_lines).map_err(|detail| {
        Doc2MdError::CorruptDocument {
            path: path.to_path_buf(),
            detail,
        }
    })?;

    debug!(
        "Tika XHTML: {} lines ({} skipped)",
        lines.len(),
        doc.skipped_lines
    );
    doc.pages.push(lines);
    Ok(doc)
}

fn heading_prefix(tag: &[u8]) -> Option<&'static str> {
    match tag {
        b"h1" => Some("#"),
        b"h2" => Some("##"),
        b"h3" => Some("###"),
        b"h4" => Some("####"),
        b"h5" => Some("#####"),
        b"h6" => Some("######"),
        _ => None,
    }
}

/// Tags whose closing marks the end of a rendered line.
fn is_line_tag(tag: &[u8]) -> bool {
    matches!(tag, b"p" | b"div" | b"li" | b"td" | b"th") || heading_prefix(tag).is_some()
}

fn parse_xhtml(
    xml: &str,
    keep_noise: bool,
    lines: &mut Vec<String>,
    skipped: &mut usize,
) -> Result<(), String> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_head = false;
    let mut prefix: &'static str = "";
    let mut current = String::new();

    let flush = |current: &mut String, prefix: &str, skipped: &mut usize, lines: &mut Vec<String>| {
        let text = current.replace('\n', " ");
        let text = text.trim();
        if !text.is_empty() {
            if !keep_noise && should_skip(text) {
                *skipped += 1;
            } else if prefix.is_empty() {
                lines.push(text.to_string());
            } else {
                lines.push(format!("{prefix} {text}"));
            }
        }
        current.clear();
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                let tag = name.as_ref();
                if tag == b"head" {
                    in_head = true;
                } else if !in_head {
                    if let Some(p) = heading_prefix(tag) {
                        flush(&mut current, prefix, skipped, lines);
                        prefix = p;
                    } else if is_line_tag(tag) {
                        flush(&mut current, prefix, skipped, lines);
                        prefix = "";
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if !in_head && e.local_name().as_ref() == b"br" {
                    flush(&mut current, prefix, skipped, lines);
                    prefix = "";
                }
            }
            Ok(Event::Text(e)) => {
                if !in_head {
                    let text = e.unescape().map_err(|err| err.to_string())?;
                    if !current.is_empty() && !current.ends_with(' ') {
                        current.push(' ');
                    }
                    current.push_str(text.trim());
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                let tag = name.as_ref();
                if tag == b"head" {
                    in_head = false;
                } else if !in_head && is_line_tag(tag) {
                    flush(&mut current, prefix, skipped, lines);
                    prefix = "";
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.to_string()),
            _ => {}
        }
        buf.clear();
    }
    flush(&mut current, prefix, skipped, lines);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> (Vec<String>, usize) {
        let mut lines = Vec::new();
        let mut skipped = 0;
        parse_xhtml(xml, false, &mut lines, &mut skipped).unwrap();
        (lines, skipped)
    }

    #[test]
    fn headings_map_to_hash_prefixes() {
        let xml = r#"<html><body>
            <h1>Energy Outlook</h1>
            <p>Renewables continue to expand.</p>
            <h2>Grid Storage</h2>
            <p>Battery costs keep falling steadily.</p>
        </body></html>"#;
        let (lines, _) = parse(xml);
        assert_eq!(
            lines,
            vec![
                "# Energy Outlook".to_string(),
                "Renewables continue to expand.".to_string(),
                "## Grid Storage".to_string(),
                "Battery costs keep falling steadily.".to_string(),
            ]
        );
    }

    #[test]
    fn head_metadata_dropped() {
        let xml = r#"<html><head><title>report.pdf</title>
            <meta name="Content-Type" content="application/pdf"/></head>
            <body><p>Visible body content only.</p></body></html>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines, vec!["Visible body content only.".to_string()]);
    }

    #[test]
    fn inline_markup_flattened() {
        let xml = r#"<html><body><p>Mixed <b>bold</b> and <i>italic</i> text.</p></body></html>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines, vec!["Mixed bold and italic text.".to_string()]);
    }

    #[test]
    fn noise_lines_skipped() {
        let xml = r#"<html><body>
            <p>2024</p>
            <p>$1,234.56</p>
            <p>A sentence worth keeping around.</p>
        </body></html>"#;
        let (lines, skipped) = parse(xml);
        assert_eq!(lines, vec!["A sentence worth keeping around.".to_string()]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn entities_unescaped() {
        let xml = r#"<html><body><p>Profit &amp; loss statements matter.</p></body></html>"#;
        let (lines, _) = parse(xml);
        assert_eq!(lines, vec!["Profit & loss statements matter.".to_string()]);
    }
}
