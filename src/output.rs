//! Output types: the assembled Markdown plus per-document statistics.
//!
//! Statistics exist mainly for the CLI's `--json` mode and for diagnosing a
//! surprising rendering: `skipped_lines` tells you how much the noise
//! classifier removed, `body_score` tells you which font size was taken as
//! body text. They are a value returned from the pipeline, never shared
//! state — each document gets its own.

use crate::adapters::InputFormat;
use serde::{Deserialize, Serialize};

/// The result of converting a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled, cleaned Markdown document.
    pub markdown: String,

    /// Which adapter produced the fragments.
    pub format: InputFormat,

    /// Pipeline statistics for this document.
    pub stats: ConversionStats,
}

/// Statistics describing one document's trip through the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages (PDF), slides (PPTX), or sections (DOCX/Tika) seen.
    pub pages: usize,

    /// Blocks that retained at least one line.
    pub blocks: usize,

    /// Lines that survived noise filtering and were rendered.
    pub lines: usize,

    /// Lines dropped by the noise classifier.
    pub skipped_lines: usize,

    /// Distinct typographic scores observed (0 for the fixed-table formats).
    pub distinct_scores: usize,

    /// The score treated as body text, when score inference was used.
    pub body_score: Option<i32>,

    /// Wall-clock conversion time.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise_round_trip() {
        let stats = ConversionStats {
            pages: 2,
            blocks: 5,
            lines: 11,
            skipped_lines: 3,
            distinct_scores: 4,
            body_score: Some(12),
            duration_ms: 7,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: ConversionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lines, 11);
        assert_eq!(back.body_score, Some(12));
    }
}
