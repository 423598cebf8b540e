//! Run configuration

use bibkeys_bibtex::ParseOptions;

use crate::skip_words::SkipWords;

/// Everything a normalization run needs besides the input text
///
/// Constructed once per invocation and handed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub skip_words: SkipWords,
    /// Resolve the month abbreviations while parsing
    pub common_strings: bool,
}

impl NormalizerConfig {
    pub fn new(skip_words: SkipWords) -> Self {
        Self {
            skip_words,
            ..Self::default()
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            common_strings: self.common_strings,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            skip_words: SkipWords::default(),
            common_strings: true,
        }
    }
}
