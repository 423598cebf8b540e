//! bibkeys core - cite key normalization
//!
//! Rewrites the cite key of every BibTeX entry to
//! `<firstauthorsurname><year><first meaningful title word>` so that the same
//! work imported from different sources ends up under one key.
//!
//! # Architecture
//!
//! ```text
//! .bib text → bibkeys_bibtex::parse → normalize → format_bibliography → write_atomic
//! ```
//!
//! Normalization is a pure function of each entry's `author`, `year` and
//! `title` fields and the skip-word set.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod output;
pub mod skip_words;

pub use config::NormalizerConfig;
pub use error::{ConfigError, KeyError, Malformed, OutputError};
pub use normalizer::{
    derive_key, extract_surname, normalize, normalize_all, title_word, Collision, KeyChange,
    Normalized,
};
pub use output::{clean_output_path, write_atomic};
pub use skip_words::{SkipWords, DEFAULT_SKIP_WORDS};
