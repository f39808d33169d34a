//! Markdown rendering: walk the built structure and emit prefixed lines.
//!
//! Rendering is a pure function of the built pages and the heading map — no
//! reordering, no filtering (the builder already dropped noise), and no
//! mutation. Rendering the same structure twice with the same map produces
//! byte-identical output.

use crate::config::PageSeparator;
use crate::pipeline::headings::HeadingMap;
use crate::pipeline::layout::Page;

/// Render one page into Markdown lines, in document order.
pub fn render_page(page: &Page, map: &HeadingMap) -> Vec<String> {
    let mut lines = Vec::new();

    for block in &page.blocks {
        for line in &block.lines {
            let text = line.joined_text();
            let text = text.trim();
            let prefix = map.prefix_for(line.score);
            if prefix.is_empty() {
                lines.push(text.to_string());
            } else {
                lines.push(format!("{prefix} {text}"));
            }
        }
    }

    lines
}

/// Render every page and assemble the final document.
///
/// Lines are joined with a blank-line separator (paragraph spacing); pages
/// that contributed no lines are skipped entirely. The configured page
/// separator is inserted between consecutive non-empty pages, carrying the
/// 1-indexed number of the page it introduces.
pub fn render_document(pages: &[Page], map: &HeadingMap, separator: &PageSeparator) -> String {
    let mut out = String::new();
    let mut any_emitted = false;

    for (index, page) in pages.iter().enumerate() {
        let lines = render_page(page, map);
        if lines.is_empty() {
            continue;
        }
        if any_emitted {
            out.push_str(&separator.render(index + 1));
        }
        out.push_str(&lines.join("\n\n"));
        any_emitted = true;
    }

    out
}
