//! BibTeX parsing and formatting
//!
//! This crate reads a `.bib` file into an ordered list of entries and writes
//! it back out, keeping every field, its spelling and its position so that a
//! parse/format cycle only changes what the caller changed.
//!
//! Features:
//! - Nom-based parser for robust BibTeX parsing
//! - `@string`, `@preamble` and `@comment` handling
//! - Optional expansion of the common month abbreviations (`jan` .. `dec`)
//! - Round-trip formatting

mod entry;
mod formatter;
mod month_macros;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{format_bibliography, format_entry};
pub use month_macros::expand_month_macro;
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError, ParseOptions};
