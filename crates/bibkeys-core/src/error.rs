//! Error types for cite key normalization

use std::path::PathBuf;

/// Why a record's fields could not produce a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    #[error("author field is empty")]
    EmptyAuthor,
    #[error("author field has a single name and no comma, so no surname can be picked")]
    SingleAuthorToken,
    #[error("title has no words")]
    EmptyTitle,
    #[error("title has no word after the leading skip word")]
    OnlySkipWord,
}

/// Failure to derive a key for one record
///
/// `key` is the record's existing cite key and `index` its position in the
/// input, so the offending entry can be found in the source file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("entry #{index} `{key}`: missing required field `{field}`")]
    MissingField {
        index: usize,
        key: String,
        field: &'static str,
    },

    #[error("entry #{index} `{key}`: malformed record: {reason}")]
    MalformedRecord {
        index: usize,
        key: String,
        reason: Malformed,
    },
}

impl KeyError {
    /// Cite key of the entry that failed
    pub fn key(&self) -> &str {
        match self {
            KeyError::MissingField { key, .. } | KeyError::MalformedRecord { key, .. } => key,
        }
    }

    /// Position of the entry that failed
    pub fn index(&self) -> usize {
        match self {
            KeyError::MissingField { index, .. } | KeyError::MalformedRecord { index, .. } => {
                *index
            }
        }
    }
}

/// Invalid normalizer configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid skip word list {input:?}: expected a list of quoted strings such as ['a','the','an']")]
    InvalidSkipList { input: String },
}

/// Failure while writing the cleaned bibliography
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
