//! Common month abbreviations
//!
//! BibTeX styles predefine `jan` .. `dec`. Files exported from reference
//! managers use them as bare macros (`month = jan`), which only resolve when
//! the parser is told to know about them.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref MONTHS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("jan", "January");
        m.insert("feb", "February");
        m.insert("mar", "March");
        m.insert("apr", "April");
        m.insert("may", "May");
        m.insert("jun", "June");
        m.insert("jul", "July");
        m.insert("aug", "August");
        m.insert("sep", "September");
        m.insert("oct", "October");
        m.insert("nov", "November");
        m.insert("dec", "December");
        m
    };
}

/// Expand a month abbreviation to the full month name
///
/// Returns `None` when `name` is not one of the twelve abbreviations.
pub fn expand_month_macro(name: &str) -> Option<&'static str> {
    MONTHS.get(name.to_lowercase().as_str()).copied()
}
