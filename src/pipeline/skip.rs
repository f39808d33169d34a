//! Noise classification: decide whether a line of text is boilerplate.
//!
//! Styled documents are full of text that carries no prose value — page
//! numbers, bare currency amounts, axis labels, stray years in footers. None
//! of the source formats flag these, so we classify them by shape alone.
//!
//! The classifier is deliberately conservative: it knows nothing about
//! document semantics and is applied identically to every format. It is
//! biased toward dropping short numeric noise; a false positive costs one
//! short line, a false negative pollutes the whole rendering.
//!
//! Rules are evaluated in order; any match means skip:
//! 1. Empty after trimming
//! 2. Numeric / currency / percent shape (`-$12,345.67`, `99%`, `...`)
//! 3. One or two words of at most 3 characters each (`ok`, `a b`)
//! 4. A bare 1–4 digit year starting with 1 or 2, optionally parenthesised
//!    (`2024`, `(1999)`)

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NUM_CURRENCY_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-$]?['`,.\d ]*[?%]?$").unwrap());

static RE_ONE_OR_TWO_SHORT_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w{0,3}( \w{0,3})?$").unwrap());

static RE_BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(?[12]\d{0,3}\)?$").unwrap());

/// Return `true` when `text` is boilerplate that should be dropped from the
/// rendered output.
///
/// Pure predicate: no state, no side effects. Callers apply it to the fully
/// joined line text, never to individual fragments — a fragment that looks
/// like noise in isolation may be meaningful in context.
pub fn should_skip(text: &str) -> bool {
    let text = text.trim();

    if text.is_empty() {
        return true;
    }

    if RE_NUM_CURRENCY_PERCENT.is_match(text) {
        return true;
    }

    if RE_ONE_OR_TWO_SHORT_WORDS.is_match(text) {
        return true;
    }

    if RE_BARE_YEAR.is_match(text) {
        return true;
    }

    false
}
