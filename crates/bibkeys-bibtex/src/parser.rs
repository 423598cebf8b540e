//! BibTeX parser implementation using nom
//!
//! This parser handles standard BibTeX format including:
//! - @string definitions
//! - @preamble declarations
//! - @comment sections
//! - All standard entry types
//! - Braced and quoted field values
//! - String concatenation with #
//! - Nested braces in field values

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt},
    IResult,
};

use super::entry::{BibTeXEntry, BibTeXEntryType};
use super::month_macros::expand_month_macro;

/// Parser switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve the predefined month macros (`jan` .. `dec`)
    pub common_strings: bool,
}

impl ParseOptions {
    pub fn with_common_strings() -> Self {
        Self {
            common_strings: true,
        }
    }
}

/// Parse error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Result of parsing a BibTeX file
///
/// `strings` keeps the `@string` definitions in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    pub strings: Vec<(String, String)>,
    pub errors: Vec<BibTeXParseError>,
}

impl BibTeXParseResult {
    /// Look up a `@string` definition (macro names are case-insensitive)
    pub fn string(&self, name: &str) -> Option<&str> {
        lookup_string(&self.strings, name)
    }
}

/// Error type for single-entry parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid syntax")]
    InvalidSyntax,
}

/// Parse a BibTeX string
///
/// Parsing never fails as a whole: entries that cannot be parsed are
/// skipped and reported in [`BibTeXParseResult::errors`], and the rest of
/// the file is still read.
pub fn parse(input: &str, options: &ParseOptions) -> BibTeXParseResult {
    parse_bibtex(input, options)
}

/// Parse a single BibTeX entry
pub fn parse_entry(input: &str, options: &ParseOptions) -> Result<BibTeXEntry, ParseError> {
    parse_bibtex(input, options)
        .entries
        .into_iter()
        .next()
        .ok_or(ParseError::InvalidSyntax)
}

/// Internal parsing function
fn parse_bibtex(input: &str, options: &ParseOptions) -> BibTeXParseResult {
    let mut result = BibTeXParseResult::default();
    let mut remaining = input;

    while !remaining.is_empty() {
        remaining = skip_whitespace_and_comments(remaining);

        if remaining.is_empty() {
            break;
        }

        if remaining.starts_with('@') {
            let ctx = MacroContext {
                strings: &result.strings,
                options,
            };
            match parse_at_entry(remaining, &ctx) {
                Ok((rest, entry_result)) => {
                    match entry_result {
                        AtEntry::Entry(entry) => result.entries.push(entry),
                        AtEntry::String(key, value) => result.strings.push((key, value)),
                        AtEntry::Preamble(text) => result.preambles.push(text),
                        AtEntry::Comment => {}
                    }
                    remaining = rest;
                }
                Err(_) => {
                    let offset = input.len() - remaining.len();
                    result.errors.push(BibTeXParseError {
                        line: line_of(input, offset),
                        column: 1,
                        message: format!("Failed to parse entry: {}", first_line(remaining)),
                    });
                    // Resume at the next @
                    match remaining[1..].find('@') {
                        Some(pos) => remaining = &remaining[pos + 1..],
                        None => break,
                    }
                }
            }
        } else {
            // Text between entries is an implicit comment
            match remaining.find('@') {
                Some(pos) => remaining = &remaining[pos..],
                None => break,
            }
        }
    }

    result
}

fn line_of(input: &str, offset: usize) -> u32 {
    input[..offset].matches('\n').count() as u32 + 1
}

fn first_line(input: &str) -> &str {
    input.lines().next().unwrap_or("").trim()
}

/// Macro resolution state shared by value parsers
struct MacroContext<'s> {
    strings: &'s [(String, String)],
    options: &'s ParseOptions,
}

impl MacroContext<'_> {
    fn resolve(&self, name: &str) -> String {
        if let Some(value) = lookup_string(self.strings, name) {
            return value.to_string();
        }
        if self.options.common_strings {
            if let Some(month) = expand_month_macro(name) {
                return month.to_string();
            }
        }
        // Undefined macros are kept by name
        name.to_string()
    }
}

fn lookup_string<'a>(strings: &'a [(String, String)], name: &str) -> Option<&'a str> {
    strings
        .iter()
        .rev()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Result of parsing an @ entry
enum AtEntry {
    Entry(BibTeXEntry),
    String(String, String),
    Preamble(String),
    Comment,
}

/// Skip whitespace and `%` line comments
fn skip_whitespace_and_comments(input: &str) -> &str {
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    &input[pos..]
}

/// Parse an @ entry (entry, string, preamble, or comment)
fn parse_at_entry<'a>(input: &'a str, ctx: &MacroContext<'_>) -> IResult<&'a str, AtEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match entry_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, ctx)?;
            Ok((rest, AtEntry::String(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, ctx)?;
            Ok((rest, AtEntry::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtEntry::Comment))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, entry_type, ctx)?;
            Ok((rest, AtEntry::Entry(entry)))
        }
    }
}

/// Parse a @string definition
fn parse_string_definition<'a>(
    input: &'a str,
    ctx: &MacroContext<'_>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, ctx)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a @preamble
fn parse_preamble<'a>(input: &'a str, ctx: &MacroContext<'_>) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, ctx)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, value))
}

/// Opening delimiter of an @ block, returning the matching closer
///
/// BibTeX accepts `@type{...}` and `@type(...)` alike.
fn open_delimiter(input: &str) -> IResult<&str, char> {
    alt((
        map(char('{'), |_| '}'),
        map(char('('), |_| ')'),
    ))(input)
}

/// Parse a @comment body (skip everything in braces or to end of line)
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

/// Parse an entry body
fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    ctx: &MacroContext<'_>,
) -> IResult<&'a str, BibTeXEntry> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, cite_key) = take_while1(is_cite_key_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = opt(char(','))(rest)?;

    let (rest, fields) = parse_fields(rest, close, ctx)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    let mut entry = BibTeXEntry::new(cite_key.to_string(), BibTeXEntryType::from_str(entry_type));
    for (key, value) in fields {
        entry.add_field(key, value);
    }

    Ok((rest, entry))
}

fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !",{}()\"#%'=".contains(c)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:.+".contains(c)
}

/// Parse fields within an entry
fn parse_fields<'a>(
    input: &'a str,
    close: char,
    ctx: &MacroContext<'_>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        if rest.starts_with(close) {
            return Ok((rest, fields));
        }

        match parse_single_field(rest, ctx) {
            Ok((rest, (key, value))) => {
                fields.push((key, value));
                remaining = rest;

                // Skip optional comma
                let (rest, _) = multispace0(remaining)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => {
                // Leave the closing brace check to the caller
                return Ok((remaining, fields));
            }
        }
    }
}

/// Parse a single field (key = value)
fn parse_single_field<'a>(
    input: &'a str,
    ctx: &MacroContext<'_>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, ctx)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a field value (braced, quoted, number, or string reference)
fn parse_field_value<'a>(input: &'a str, ctx: &MacroContext<'_>) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(take_while1(is_name_char), |s: &str| ctx.resolve(s)),
        ))(rest)?;

        result.push_str(&part);
        remaining = rest;

        // Check for concatenation
        let (rest, _) = multispace0(remaining)?;
        if let Some(stripped) = rest.strip_prefix('#') {
            remaining = stripped;
        } else {
            return Ok((rest, result));
        }
    }
}

/// Parse a braced value {content}
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    let inner = &content[1..content.len() - 1];
    Ok((rest, inner.to_string()))
}

/// Parse braced content including nested braces
///
/// Every brace counts toward the depth, backslash or not, as in BibTeX.
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a quoted value "content"
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    };

    let mut brace_depth = 0usize;
    let mut escaped = false;

    for (pos, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '"' if brace_depth == 0 => {
                return Ok((&body[pos + 1..], body[..pos].to_string()));
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}
