//! Configuration types for document-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share configs across a batch, serialise them for
//! logging, and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A many-field constructor breaks on every new field. The builder lets
//! callers set only what they care about and rely on documented defaults.

use crate::adapters::InputFormat;
use crate::error::Doc2MdError;
use crate::pipeline::headings::MAX_HEADING_DEPTH;
use serde::{Deserialize, Serialize};

/// Configuration for a document-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_heading_depth(3)
///     .keep_noise(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Input format override. Default: None (detect from file extension).
    pub format: Option<InputFormat>,

    /// Deepest heading level to assign from typographic rank. Range: 1–6.
    /// Default: 6.
    ///
    /// Scores ranked beyond this depth render as body text. Markdown itself
    /// stops at `######`, so 6 is a hard ceiling; lowering it flattens minor
    /// sub-headings into body text, which reads better for documents that
    /// use many decorative font sizes.
    pub max_heading_depth: usize,

    /// Disable the noise classifier. Default: false.
    ///
    /// Page numbers, bare currency figures, and stray short tokens are
    /// normally dropped before rendering. Turning this on keeps every line,
    /// which is useful when diagnosing why a line went missing from the
    /// output.
    pub keep_noise: bool,

    /// Separator between pages in the assembled output. Default: None.
    pub page_separator: PageSeparator,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            format: None,
            max_heading_depth: MAX_HEADING_DEPTH,
            keep_noise: false,
            page_separator: PageSeparator::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn format(mut self, format: InputFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    pub fn max_heading_depth(mut self, depth: usize) -> Self {
        self.config.max_heading_depth = depth.clamp(1, MAX_HEADING_DEPTH);
        self
    }

    pub fn keep_noise(mut self, v: bool) -> Self {
        self.config.keep_noise = v;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Doc2MdError> {
        let c = &self.config;
        if c.max_heading_depth == 0 || c.max_heading_depth > MAX_HEADING_DEPTH {
            return Err(Doc2MdError::InvalidConfig(format!(
                "max_heading_depth must be 1–{MAX_HEADING_DEPTH}, got {}",
                c.max_heading_depth
            )));
        }
        Ok(self.config)
    }
}

/// How to separate pages in the assembled Markdown output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}
