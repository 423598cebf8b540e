//! Cite key normalization
//!
//! Every entry gets the key `<surname><year><titleword>`:
//!
//! - **surname**: first author's last name, lowercased, non-word characters
//!   removed. `"Smith, John"` gives `smith`; `"John Smith and Jane Doe"`
//!   gives `smith` (the second name token).
//! - **year**: the `year` field verbatim.
//! - **titleword**: first word of the lowercased, punctuation-free title, or
//!   the second word if the first is a skip word.
//!
//! Keys depend only on the entry's own fields, so two entries for the same
//! work imported from different sources end up with the same key.
//! Collisions between distinct works are reported, never resolved.

use std::collections::BTreeMap;

use bibkeys_bibtex::BibTeXEntry;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{KeyError, Malformed};
use crate::skip_words::SkipWords;

lazy_static! {
    // Anything that is not a letter, digit or underscore
    static ref NON_WORD: Regex = Regex::new(r"\W+").unwrap();

    // Punctuation and underscores; letters, digits and whitespace survive
    static ref TITLE_PUNCT: Regex = Regex::new(r"(?:[^\s\w]|_)+").unwrap();
}

/// A key that changed during normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChange {
    pub index: usize,
    pub old_key: String,
    pub new_key: String,
}

/// Entries sharing one computed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: String,
    pub indices: Vec<usize>,
}

/// Output of a normalization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Entries in input order, identical to the input except for the cite key
    pub entries: Vec<BibTeXEntry>,
    /// Entries whose key differs from the one they had
    pub changes: Vec<KeyChange>,
}

impl Normalized {
    /// Keys computed for more than one entry, sorted by key
    pub fn collisions(&self) -> Vec<Collision> {
        let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            by_key.entry(&entry.cite_key).or_default().push(index);
        }

        by_key
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(key, indices)| Collision {
                key: key.to_string(),
                indices,
            })
            .collect()
    }
}

/// Normalize every entry, stopping at the first one that has no valid key
pub fn normalize(entries: &[BibTeXEntry], skip_words: &SkipWords) -> Result<Normalized, KeyError> {
    let mut normalized = Normalized {
        entries: Vec::with_capacity(entries.len()),
        changes: Vec::new(),
    };

    for (index, entry) in entries.iter().enumerate() {
        let (entry, change) = normalize_entry(index, entry, skip_words)?;
        normalized.entries.push(entry);
        normalized.changes.extend(change);
    }

    Ok(normalized)
}

/// Normalize every entry, collecting all failures instead of stopping
///
/// Returns the failures in input order if any entry has no valid key.
pub fn normalize_all(
    entries: &[BibTeXEntry],
    skip_words: &SkipWords,
) -> Result<Normalized, Vec<KeyError>> {
    let mut normalized = Normalized {
        entries: Vec::with_capacity(entries.len()),
        changes: Vec::new(),
    };
    let mut errors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match normalize_entry(index, entry, skip_words) {
            Ok((entry, change)) => {
                normalized.entries.push(entry);
                normalized.changes.extend(change);
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn normalize_entry(
    index: usize,
    entry: &BibTeXEntry,
    skip_words: &SkipWords,
) -> Result<(BibTeXEntry, Option<KeyChange>), KeyError> {
    let new_key = derive_key(index, entry, skip_words)?;

    let change = (new_key != entry.cite_key).then(|| {
        tracing::debug!(
            index,
            old_key = %entry.cite_key,
            new_key = %new_key,
            "cite key changed"
        );
        KeyChange {
            index,
            old_key: entry.cite_key.clone(),
            new_key: new_key.clone(),
        }
    });

    Ok((entry.with_cite_key(new_key), change))
}

/// Compute the normalized cite key of one entry
///
/// `index` is only used to identify the entry in errors.
pub fn derive_key(
    index: usize,
    entry: &BibTeXEntry,
    skip_words: &SkipWords,
) -> Result<String, KeyError> {
    let field = |name: &'static str| {
        entry.get_field(name).ok_or_else(|| KeyError::MissingField {
            index,
            key: entry.cite_key.clone(),
            field: name,
        })
    };
    let malformed = |reason: Malformed| KeyError::MalformedRecord {
        index,
        key: entry.cite_key.clone(),
        reason,
    };

    let author = field("author")?;
    let year = field("year")?;
    let title = field("title")?;

    let surname = extract_surname(author).map_err(malformed)?;
    let word = title_word(title, skip_words).map_err(malformed)?;

    Ok(format!("{surname}{year}{word}"))
}

/// First author's surname, lowercased and stripped of non-word characters
///
/// `"Last, First ..."` yields `Last`; anything else is read as
/// `"First Last ..."` and yields the second token.
pub fn extract_surname(author: &str) -> Result<String, Malformed> {
    let mut tokens = author.split_whitespace();
    let first = tokens.next().ok_or(Malformed::EmptyAuthor)?;

    let raw = match first.strip_suffix(',') {
        Some(last) => last,
        None => tokens.next().ok_or(Malformed::SingleAuthorToken)?,
    };

    Ok(NON_WORD.replace_all(&raw.to_lowercase(), "").into_owned())
}

/// First meaningful title word
///
/// Only one leading skip word is passed over; the word after it is used
/// even if it is a skip word too.
pub fn title_word(title: &str, skip_words: &SkipWords) -> Result<String, Malformed> {
    let cleaned = TITLE_PUNCT.replace_all(&title.to_lowercase(), "").into_owned();
    let mut tokens = cleaned.split_whitespace();

    let first = tokens.next().ok_or(Malformed::EmptyTitle)?;
    let word = if skip_words.contains(first) {
        tokens.next().ok_or(Malformed::OnlySkipWord)?
    } else {
        first
    };

    Ok(word.to_string())
}
