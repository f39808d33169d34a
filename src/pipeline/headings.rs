//! Heading-level resolution: map typographic scores to Markdown prefixes.
//!
//! The mapping is derived per document, never globally: the same 14pt text
//! is a heading in one report and body text in another. The most frequent
//! score (by surviving-line count) is taken as body text; every distinct
//! score above it gets a heading depth by rank, capped at six levels.
//!
//! The map is built exactly once, after the structure pass has tallied every
//! line, and is immutable from then on — passing it by value into the
//! renderer is what enforces the two-pass ordering structurally.

use crate::pipeline::layout::ScoreTally;
use std::collections::HashMap;

/// Markdown allows `#` through `######`.
pub const MAX_HEADING_DEPTH: usize = 6;

/// Immutable mapping from typographic score to Markdown heading prefix
/// (`""` for body text, `"#"`…`"######"` for headings).
#[derive(Debug, Clone, Default)]
pub struct HeadingMap {
    prefixes: HashMap<i32, String>,
}

impl HeadingMap {
    /// Build the score→prefix map from a completed tally.
    ///
    /// Scores are ranked descending; the score at rank `i` maps to a heading
    /// of depth `i + 1` when it is strictly greater than the dominant score
    /// and within `max_depth`, otherwise to the empty (body) prefix. An
    /// empty tally yields an empty map, which is fine: a document with no
    /// lines never performs a lookup.
    pub fn build(tally: &ScoreTally, max_depth: usize) -> HeadingMap {
        let mut prefixes = HashMap::new();

        let Some(dominant) = tally.dominant_score() else {
            return HeadingMap { prefixes };
        };

        let mut scores = tally.distinct_scores();
        scores.sort_unstable_by(|a, b| b.cmp(a));

        for (index, score) in scores.into_iter().enumerate() {
            let prefix = if score <= dominant || index >= max_depth {
                String::new()
            } else {
                "#".repeat(index + 1)
            };
            prefixes.insert(score, prefix);
        }

        HeadingMap { prefixes }
    }

    /// Look up the prefix for a line's score.
    ///
    /// # Panics
    ///
    /// Panics when the score was never tallied. Every rendered line's score
    /// passed through the same builder that fed the tally, so a miss means
    /// the structure pass and this map are out of sync — a programming
    /// error, not an input condition, and silently defaulting would mask it.
    pub fn prefix_for(&self, score: i32) -> &str {
        self.prefixes
            .get(&score)
            .unwrap_or_else(|| panic!("score {score} missing from heading map; tally and structure are out of sync"))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }
}
