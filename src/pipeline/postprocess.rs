//! Post-processing: deterministic cleanup of the assembled Markdown.
//!
//! The renderer's output is already well-formed, but source documents leak
//! artefacts through the adapters — carriage returns from DOCX runs, soft
//! hyphens and zero-width characters from PDF glyph streams, trailing spaces
//! from justified text. This module applies a few cheap string rules so
//! every adapter's output meets the same hygiene bar. Each rule is a pure
//! `&str → String` function and independently testable.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF → LF)
//! 2. Trim trailing whitespace per line
//! 3. Collapse 3+ consecutive newlines down to the standard blank-line gap
//! 4. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 5. Ensure the document ends with exactly one newline

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to an assembled Markdown document.
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello   \nworld  "),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("hello"), "hello\n");
        assert_eq!(ensure_final_newline("hello\n\n\n"), "hello\n");
    }

    #[test]
    fn empty_document_stays_empty() {
        assert_eq!(clean_markdown(""), "");
        assert_eq!(clean_markdown("\n\n"), "");
    }

    #[test]
    fn test_clean_markdown_full_pipeline() {
        let input = "# Title\r\n\r\nSome text   \n\n\n\nMore text\u{200B}";
        let result = clean_markdown(input);
        assert_eq!(result, "# Title\n\nSome text\n\nMore text\n");
    }
}
