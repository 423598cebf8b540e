//! Title words that are not "meaningful" for a cite key

use std::collections::BTreeSet;
use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, multispace0},
    combinator::{all_consuming, opt},
    multi::separated_list0,
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

use crate::error::ConfigError;

/// Words skipped when they lead a title
pub const DEFAULT_SKIP_WORDS: [&str; 3] = ["a", "the", "an"];

/// Set of lowercase title words to skip
///
/// Built once per run and passed by reference; entries are lowercased on
/// construction so lookups match the lowercased title tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipWords {
    words: BTreeSet<String>,
}

impl SkipWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// An empty set: the first title word is always used
    pub fn none() -> Self {
        Self {
            words: BTreeSet::new(),
        }
    }

    /// Parse a list literal such as `['a','the','an']` or `["a", "the"]`
    pub fn parse_list(input: &str) -> Result<Self, ConfigError> {
        match all_consuming(delimited(multispace0, list_literal, multispace0))(input) {
            Ok((_, words)) => Ok(Self::new(words)),
            Err(_) => Err(ConfigError::InvalidSkipList {
                input: input.to_string(),
            }),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl Default for SkipWords {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_WORDS)
    }
}

impl fmt::Display for SkipWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.iter().map(|w| format!("'{}'", w)).collect();
        write!(f, "[{}]", items.join(","))
    }
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
    ))(input)
}

/// `[item, item, ...]` with an optional trailing comma
fn list_literal(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        pair(char('['), multispace0),
        terminated(
            separated_list0(tuple((multispace0, char(','), multispace0)), quoted),
            pair(multispace0, opt(pair(char(','), multispace0))),
        ),
        char(']'),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_words() {
        let skip = SkipWords::default();
        assert_eq!(skip.len(), 3);
        assert!(skip.contains("a"));
        assert!(skip.contains("the"));
        assert!(skip.contains("an"));
        assert!(!skip.contains("of"));
    }

    #[test]
    fn test_parse_python_style_list() {
        let skip = SkipWords::parse_list("['a','the','an']").unwrap();
        assert_eq!(skip, SkipWords::default());
    }

    #[test]
    fn test_parse_double_quotes_and_spacing() {
        let skip = SkipWords::parse_list(r#" [ "on" , 'of', "The", ] "#).unwrap();
        assert_eq!(skip.iter().collect::<Vec<_>>(), vec!["of", "on", "the"]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(SkipWords::parse_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_bare_words() {
        let err = SkipWords::parse_list("a,the,an").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSkipList {
                input: "a,the,an".to_string()
            }
        );
        assert!(SkipWords::parse_list("['a', the]").is_err());
        assert!(SkipWords::parse_list("['a'").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let skip = SkipWords::default();
        assert_eq!(SkipWords::parse_list(&skip.to_string()).unwrap(), skip);
    }
}
