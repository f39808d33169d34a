//! Fragment model and line/block structure building.
//!
//! Format adapters hand the core a flat stream of styled fragments plus the
//! block boundaries the source format defines (a PDF text box, a DOCX
//! paragraph). This module assembles that stream into the immutable
//! `Page → Block → Line → Fragment` structure the renderer walks, applying
//! the noise classifier at joined-line granularity, and tallies how often
//! each typographic score produced a surviving line.
//!
//! The tally is the first of the two logical passes over a document: the
//! heading resolver ([`crate::pipeline::headings::HeadingMap`]) cannot be
//! built until every line has been counted, so structure building completes
//! before any rendering begins.

use crate::pipeline::skip::should_skip;

/// Smallest unit of styled text handed to the core by a format adapter.
///
/// `score` is an ordinal typographic weight — for PDF, the rounded glyph
/// font size. It ranks text for heading inference and is never treated as a
/// physical measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub score: i32,
}

impl Fragment {
    /// Create a fragment, trimming surrounding whitespace.
    ///
    /// Returns `None` for whitespace-only text: empty fragments are never
    /// materialized.
    pub fn new(text: &str, score: i32) -> Option<Fragment> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Fragment {
            text: text.to_string(),
            score,
        })
    }
}

/// A run of adjacent fragments sharing one typographic score.
///
/// Invariant: non-empty, and every fragment's score equals `score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub score: i32,
    pub fragments: Vec<Fragment>,
}

impl Line {
    fn new(fragment: Fragment) -> Line {
        Line {
            score: fragment.score,
            fragments: vec![fragment],
        }
    }

    /// Fragment texts joined by single spaces — the text the noise
    /// classifier sees and the renderer emits.
    pub fn joined_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An externally-defined structural grouping (paragraph, text box, cell).
/// The core never invents block boundaries; it only populates lines within
/// the boundaries an adapter supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub lines: Vec<Line>,
}

/// One page (or slide, or section) of built structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Frequency tally of typographic scores, one count per surviving line.
///
/// Insertion-ordered so that `dominant_score` breaks count ties in favour of
/// the score seen first in document order, matching the behaviour the
/// renderer's consumers rely on for stable output.
#[derive(Debug, Clone, Default)]
pub struct ScoreTally {
    counts: Vec<(i32, usize)>,
}

impl ScoreTally {
    pub fn new() -> ScoreTally {
        ScoreTally::default()
    }

    fn record(&mut self, score: i32) {
        if let Some(entry) = self.counts.iter_mut().find(|(s, _)| *s == score) {
            entry.1 += 1;
        } else {
            self.counts.push((score, 1));
        }
    }

    /// The most frequent score, or `None` for an empty document.
    pub fn dominant_score(&self) -> Option<i32> {
        let mut best: Option<(i32, usize)> = None;
        for &(score, count) in &self.counts {
            match best {
                // Strict inequality: first-encountered wins ties.
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((score, count)),
            }
        }
        best.map(|(score, _)| score)
    }

    /// Every distinct score observed, in first-encountered order.
    pub fn distinct_scores(&self) -> Vec<i32> {
        self.counts.iter().map(|&(s, _)| s).collect()
    }

    /// Total number of surviving lines across the document.
    pub fn total_lines(&self) -> usize {
        self.counts.iter().map(|&(_, c)| c).sum()
    }
}

/// Builds the page/block/line structure from a stream of
/// (page-boundary, block-boundary, fragment) events.
///
/// Lifecycle per document: any number of `begin_page` / `begin_block` /
/// `push_fragment` / `end_block` / `end_page` calls, then a single
/// [`finish`](DocumentBuilder::finish). A line stays open while incoming
/// fragments share its score; the arrival of a differently-scored fragment
/// or the end of the block closes it, at which point the joined line text is
/// checked against the noise classifier. A skipped line drops all of its
/// fragments — never a partial line.
#[derive(Debug)]
pub struct DocumentBuilder {
    pages: Vec<Page>,
    current_page: Page,
    current_block: Block,
    open_line: Option<Line>,
    page_open: bool,
    tally: ScoreTally,
    skipped_lines: usize,
    keep_noise: bool,
}

/// Everything the structure pass produces: the immutable pages, the score
/// tally for the heading resolver, and the count of noise lines dropped.
#[derive(Debug)]
pub struct BuiltDocument {
    pub pages: Vec<Page>,
    pub tally: ScoreTally,
    pub skipped_lines: usize,
}

impl BuiltDocument {
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}

impl DocumentBuilder {
    pub fn new(keep_noise: bool) -> DocumentBuilder {
        DocumentBuilder {
            pages: Vec::new(),
            current_page: Page::default(),
            current_block: Block::default(),
            open_line: None,
            page_open: false,
            tally: ScoreTally::new(),
            skipped_lines: 0,
            keep_noise,
        }
    }

    /// Start a new page, closing any block still open on the previous one.
    pub fn begin_page(&mut self) {
        self.end_page();
        self.page_open = true;
    }

    /// Start a new block boundary. The currently open line (if any) belongs
    /// to the previous block and is closed first.
    pub fn begin_block(&mut self) {
        self.end_block();
    }

    /// Feed one styled fragment in document order.
    pub fn push_fragment(&mut self, fragment: Fragment) {
        match self.open_line {
            Some(ref mut line) if line.score == fragment.score => {
                line.fragments.push(fragment);
            }
            _ => {
                self.close_open_line();
                self.open_line = Some(Line::new(fragment));
            }
        }
    }

    /// Close the current block. Blocks that retained no lines are dropped
    /// silently.
    pub fn end_block(&mut self) {
        self.close_open_line();
        if !self.current_block.lines.is_empty() {
            self.current_page
                .blocks
                .push(std::mem::take(&mut self.current_block));
        }
    }

    /// Close the current page. Pages with no surviving blocks are kept (they
    /// contribute nothing to the rendering but preserve page numbering for
    /// separators).
    pub fn end_page(&mut self) {
        self.end_block();
        if self.page_open {
            self.pages.push(std::mem::take(&mut self.current_page));
            self.page_open = false;
        }
    }

    /// Finish the document, closing anything still open. Content pushed
    /// without an explicit page becomes a single implicit page.
    pub fn finish(mut self) -> BuiltDocument {
        self.end_block();
        if self.page_open || !self.current_page.is_empty() {
            self.pages.push(std::mem::take(&mut self.current_page));
        }
        BuiltDocument {
            pages: self.pages,
            tally: self.tally,
            skipped_lines: self.skipped_lines,
        }
    }

    fn close_open_line(&mut self) {
        if let Some(line) = self.open_line.take() {
            if !self.keep_noise && should_skip(&line.joined_text()) {
                self.skipped_lines += 1;
                return;
            }
            self.tally.record(line.score);
            self.current_block.lines.push(line);
        }
    }
}
