//! The structure-inference pipeline: styled fragments in, Markdown out.
//!
//! Each submodule implements exactly one stage. Keeping stages separate
//! makes each independently testable and keeps the two-pass dependency
//! explicit in the types rather than in call-site convention.
//!
//! ## Data Flow
//!
//! ```text
//! fragments ──▶ layout ──▶ headings ──▶ render ──▶ postprocess
//! (adapter)    (build +    (score→      (markdown  (cleanup)
//!               tally)      prefix map)  lines)
//! ```
//!
//! 1. [`skip`]     — pure noise predicate applied to joined line text
//! 2. [`layout`]   — merge fragments into lines and lines into blocks,
//!    tallying how often each score produced a surviving line
//! 3. [`headings`] — rank tallied scores against the dominant (body) score
//!    into an immutable score→prefix map
//! 4. [`render`]   — walk the built structure and emit prefixed Markdown
//! 5. [`postprocess`] — deterministic hygiene rules shared by every adapter

pub mod headings;
pub mod layout;
pub mod postprocess;
pub mod render;
pub mod skip;
