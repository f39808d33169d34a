//! End-to-end integration tests for doc2md.
//!
//! PDF extraction needs a native pdfium library, so the PDF path is
//! exercised here through the pipeline stages directly with synthetic
//! fragments. The DOCX/PPTX/Tika adapters run against real files built on
//! the fly (minimal but valid OOXML packages and XHTML).
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use doc2md::pipeline::headings::HeadingMap;
use doc2md::pipeline::layout::{DocumentBuilder, Fragment};
use doc2md::pipeline::{postprocess, render};
use doc2md::{convert, convert_to_file, ConversionConfig, InputFormat, PageSeparator};
use std::io::Write;
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Assert the markdown passes basic quality checks.
fn assert_markdown_quality(md: &str, context: &str) {
    assert!(!md.trim().is_empty(), "[{context}] Markdown is empty");
    assert!(
        md.ends_with('\n'),
        "[{context}] Markdown must end with a newline"
    );
    assert!(
        !md.contains("\n\n\n"),
        "[{context}] Output has more than one consecutive blank line"
    );

    let invisible = ['\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}', '\u{2060}'];
    for ch in invisible {
        assert!(
            !md.contains(ch),
            "[{context}] Output contains invisible char U+{:04X}",
            ch as u32
        );
    }
}

/// Write a minimal but valid DOCX package containing the given body XML.
fn write_docx(path: &Path, body: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
    .unwrap();

    zip.finish().unwrap();
}

/// Write a minimal PPTX package with one slide part per body string.
fn write_pptx(path: &Path, slides: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();

    for (i, body) in slides.iter().enumerate() {
        zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
            .unwrap();
        write!(
            zip,
            r#"<?xml version="1.0"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">{body}</p:sld>"#
        )
        .unwrap();
    }

    zip.finish().unwrap();
}

fn docx_paragraph(style: Option<&str>, text: &str) -> String {
    let style_xml = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p>{style_xml}<w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

fn pptx_paragraph(text: &str) -> String {
    format!(r#"<a:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></a:txBody>"#)
}

// ── PDF pipeline (synthetic fragments) ───────────────────────────────────────

#[test]
fn score_inference_end_to_end() {
    // Two pages: a large title, body text, and a bare page number that the
    // noise classifier must drop before it can reach the tally.
    let mut b = DocumentBuilder::new(false);
    b.begin_page();
    b.begin_block();
    b.push_fragment(Fragment::new("Introduction", 24).unwrap());
    b.begin_block();
    b.push_fragment(Fragment::new("This is body text.", 12).unwrap());
    b.begin_block();
    b.push_fragment(Fragment::new("More body text keeps the tally honest.", 12).unwrap());
    b.begin_page();
    b.begin_block();
    b.push_fragment(Fragment::new("Conclusion", 24).unwrap());
    b.begin_block();
    b.push_fragment(Fragment::new("Closing body paragraph.", 12).unwrap());
    b.begin_block();
    b.push_fragment(Fragment::new("2", 10).unwrap());
    let built = b.finish();

    assert_eq!(built.skipped_lines, 1, "page number should be filtered");

    let map = HeadingMap::build(&built.tally, 6);
    let md = render::render_document(&built.pages, &map, &PageSeparator::None);
    let md = postprocess::clean_markdown(&md);

    assert_markdown_quality(&md, "score inference");
    assert!(md.starts_with("# Introduction\n\nThis is body text."));
    assert!(md.contains("# Conclusion"));
    assert!(!md.contains("\n2\n"), "bare page number leaked into output");
}

#[test]
fn equal_scores_merge_into_one_line() {
    // Fragments with the same score on one visual line join with spaces and
    // count as a single tally entry.
    let mut b = DocumentBuilder::new(false);
    b.begin_page();
    b.begin_block();
    b.push_fragment(Fragment::new("Chapter", 24).unwrap());
    b.push_fragment(Fragment::new("One", 24).unwrap());
    b.begin_block();
    b.push_fragment(Fragment::new("Body follows the chapter heading.", 12).unwrap());
    b.push_fragment(Fragment::new("Still the same body line.", 12).unwrap());
    let built = b.finish();

    assert_eq!(built.tally.total_lines(), 2);

    let map = HeadingMap::build(&built.tally, 6);
    let md = render::render_document(&built.pages, &map, &PageSeparator::None);
    assert!(md.starts_with("# Chapter One"));
}

#[test]
fn heading_depth_cap_flattens_minor_sizes() {
    // Seven distinct sizes above body with the default cap of 6: the
    // seventh-ranked size renders as body text.
    let mut b = DocumentBuilder::new(false);
    b.begin_page();
    for (text, score) in [
        ("Level one heading text", 40),
        ("Level two heading text", 36),
        ("Level three heading text", 32),
        ("Level four heading text", 28),
        ("Level five heading text", 24),
        ("Level six heading text", 20),
        ("Level seven heading text", 16),
    ] {
        b.begin_block();
        b.push_fragment(Fragment::new(text, score).unwrap());
    }
    for _ in 0..3 {
        b.begin_block();
        b.push_fragment(Fragment::new("Repeated body text anchors the dominant score.", 12).unwrap());
    }
    let built = b.finish();

    let map = HeadingMap::build(&built.tally, 6);
    let md = render::render_document(&built.pages, &map, &PageSeparator::None);

    assert!(md.contains("# Level one heading text"));
    assert!(md.contains("###### Level six heading text"));
    assert!(
        md.contains("\n\nLevel seven heading text\n\n"),
        "rank beyond the cap must render as body text"
    );
}

#[test]
fn page_separators_between_nonempty_pages() {
    let mut b = DocumentBuilder::new(false);
    b.begin_page();
    b.begin_block();
    b.push_fragment(Fragment::new("First page content line.", 12).unwrap());
    b.begin_page(); // empty page, no separator emitted for it
    b.begin_page();
    b.begin_block();
    b.push_fragment(Fragment::new("Third page content line.", 12).unwrap());
    let built = b.finish();

    let map = HeadingMap::build(&built.tally, 6);
    let md = render::render_document(&built.pages, &map, &PageSeparator::HorizontalRule);
    assert_eq!(
        md,
        "First page content line.\n\n---\n\nThird page content line."
    );
}

// ── DOCX ─────────────────────────────────────────────────────────────────────

#[test]
fn docx_styles_drive_heading_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styled.docx");
    let body = [
        docx_paragraph(Some("Heading1"), "Project Overview"),
        docx_paragraph(None, "The project began in earnest last spring."),
        docx_paragraph(Some("Heading2"), "Milestones"),
        docx_paragraph(None, "Each milestone closed on schedule."),
        docx_paragraph(None, "42"), // noise, dropped
    ]
    .concat();
    write_docx(&path, &body);

    let out = convert(&path, &ConversionConfig::default()).unwrap();
    assert_eq!(out.format, InputFormat::Docx);
    assert_markdown_quality(&out.markdown, "docx");
    assert!(out.markdown.starts_with("# Project Overview"));
    assert!(out.markdown.contains("## Milestones"));
    assert!(!out.markdown.contains("42"));
    assert_eq!(out.stats.skipped_lines, 1);
    assert_eq!(out.stats.body_score, None);
}

#[test]
fn docx_keep_noise_retains_filtered_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noisy.docx");
    let body = [
        docx_paragraph(None, "Real content paragraph survives."),
        docx_paragraph(None, "2024"),
    ]
    .concat();
    write_docx(&path, &body);

    let config = ConversionConfig::builder().keep_noise(true).build().unwrap();
    let out = convert(&path, &config).unwrap();
    assert!(out.markdown.contains("2024"));
    assert_eq!(out.stats.skipped_lines, 0);
}

// ── PPTX ─────────────────────────────────────────────────────────────────────

#[test]
fn pptx_slides_become_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    write_pptx(
        &path,
        &[
            &pptx_paragraph("Opening remarks set the agenda."),
            &pptx_paragraph("Second slide carries the details."),
        ],
    );

    let out = convert(&path, &ConversionConfig::default()).unwrap();
    assert_eq!(out.format, InputFormat::Pptx);
    assert_markdown_quality(&out.markdown, "pptx");
    assert!(out.markdown.contains("## Slide 1"));
    assert!(out.markdown.contains("## Slide 2"));
    assert!(out.markdown.contains("Opening remarks set the agenda."));
    assert_eq!(out.stats.pages, 2);
}

#[test]
fn pptx_slides_ordered_numerically() {
    // Eleven slides: lexical part order would put slide10 and slide11
    // between slide1 and slide2.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big-deck.pptx");
    let bodies: Vec<String> = (1..=11)
        .map(|i| pptx_paragraph(&format!("Slide body number {i} in order.")))
        .collect();
    let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
    write_pptx(&path, &refs);

    let out = convert(&path, &ConversionConfig::default()).unwrap();
    let pos_2 = out.markdown.find("Slide body number 2 ").unwrap();
    let pos_10 = out.markdown.find("Slide body number 10 ").unwrap();
    let pos_11 = out.markdown.find("Slide body number 11 ").unwrap();
    assert!(pos_2 < pos_10 && pos_10 < pos_11);
}

// ── Tika XHTML ───────────────────────────────────────────────────────────────

#[test]
fn tika_headings_and_noise_filtering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extracted.html");
    std::fs::write(
        &path,
        r#"<html><head><title>source.pdf</title></head><body>
            <h1>Annual Energy Paper</h1>
            <p>Electrification continues to accelerate worldwide.</p>
            <h2>Grid Capacity</h2>
            <p>$1,234.56</p>
            <p>Transmission buildout lags demand growth.</p>
        </body></html>"#,
    )
    .unwrap();

    let out = convert(&path, &ConversionConfig::default()).unwrap();
    assert_eq!(out.format, InputFormat::TikaHtml);
    assert_markdown_quality(&out.markdown, "tika");
    assert!(out.markdown.starts_with("# Annual Energy Paper"));
    assert!(out.markdown.contains("## Grid Capacity"));
    assert!(!out.markdown.contains("source.pdf"), "head metadata leaked");
    assert!(!out.markdown.contains("$1,234.56"), "noise line leaked");
}

// ── File output and batch ────────────────────────────────────────────────────

#[test]
fn convert_to_file_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.html");
    std::fs::write(
        &path,
        "<html><body><h1>Memo Title</h1><p>Memo body goes here.</p></body></html>",
    )
    .unwrap();

    let (target, _) = convert_to_file(&path, None, &ConversionConfig::default()).unwrap();
    assert_eq!(target, dir.path().join("memo.html.md"));
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("# Memo Title"));
    assert!(
        !dir.path().join("memo.html.md.tmp").exists(),
        "temporary file left behind"
    );
}

#[test]
fn batch_converts_mixed_formats() {
    let dir = tempfile::tempdir().unwrap();

    let docx = dir.path().join("a.docx");
    write_docx(&docx, &docx_paragraph(None, "Document body for the batch."));

    let html = dir.path().join("b.html");
    std::fs::write(
        &html,
        "<html><body><p>HTML body for the batch.</p></body></html>",
    )
    .unwrap();

    let missing = dir.path().join("c.pptx");

    let inputs: Vec<PathBuf> = vec![docx, html, missing];
    let results = doc2md::convert_batch(&inputs, &ConversionConfig::default());

    assert_eq!(results.len(), 3);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_ok());
    assert!(results[2].1.is_err());
    assert_eq!(
        results[0].1.as_ref().unwrap().format,
        InputFormat::Docx
    );
}
