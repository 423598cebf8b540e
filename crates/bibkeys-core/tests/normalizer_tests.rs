//! Cite key normalization integration tests

use bibkeys_bibtex::{parse, BibTeXEntry, BibTeXEntryType, ParseOptions};
use bibkeys_core::{normalize, normalize_all, KeyError, Malformed, SkipWords};
use proptest::prelude::*;
use rstest::rstest;

fn entry(key: &str, author: &str, year: &str, title: &str) -> BibTeXEntry {
    let mut e = BibTeXEntry::new(key.to_string(), BibTeXEntryType::Article);
    e.add_field("author", author);
    e.add_field("year", year);
    e.add_field("title", title);
    e.add_field("journal", "Journal of Things");
    e
}

// === Key derivation ===

#[rstest]
#[case("Smith, John", "2020", "The Great Idea", "smith2020great")]
#[case("John Smith and Jane Doe", "1999", "A Study Of Things", "smith1999study")]
#[case("O'Brien, Pat", "2001", "Self-Organization: Theory", "obrien2001selforganization")]
#[case("Jane Doe", "2010", "An Introduction", "doe2010introduction")]
#[case("Doe, Jane and Smith, John", "2015", "Theory of Everything", "doe2015theory")]
fn test_derived_keys(
    #[case] author: &str,
    #[case] year: &str,
    #[case] title: &str,
    #[case] expected: &str,
) {
    let input = vec![entry("OldKey", author, year, title)];
    let result = normalize(&input, &SkipWords::default()).unwrap();
    assert_eq!(result.entries[0].cite_key, expected);
}

#[test]
fn test_custom_skip_words() {
    let skip = SkipWords::parse_list("['on', 'of']").unwrap();
    let input = vec![entry("k", "Smith, John", "2020", "On Computable Numbers")];

    let result = normalize(&input, &skip).unwrap();
    assert_eq!(result.entries[0].cite_key, "smith2020computable");

    // "The" is no longer skipped
    let input = vec![entry("k", "Smith, John", "2020", "The Great Idea")];
    let result = normalize(&input, &skip).unwrap();
    assert_eq!(result.entries[0].cite_key, "smith2020the");
}

#[test]
fn test_single_token_author_is_malformed() {
    let input = vec![entry("Smith99", "Smith", "1999", "Things")];
    let err = normalize(&input, &SkipWords::default()).unwrap_err();

    assert_eq!(
        err,
        KeyError::MalformedRecord {
            index: 0,
            key: "Smith99".to_string(),
            reason: Malformed::SingleAuthorToken,
        }
    );
    assert!(err.to_string().contains("Smith99"));
}

#[test]
fn test_missing_title_reported_in_batch() {
    let mut no_title = BibTeXEntry::new("notitle".to_string(), BibTeXEntryType::Misc);
    no_title.add_field("author", "Doe, Jane");
    no_title.add_field("year", "2000");

    let input = vec![
        entry("ok", "Smith, John", "2020", "Idea"),
        no_title,
        entry("empty", "", "2020", "Idea"),
    ];
    let errors = normalize_all(&input, &SkipWords::default()).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        KeyError::MissingField { field: "title", index: 1, .. }
    ));
    assert!(matches!(
        &errors[1],
        KeyError::MalformedRecord { reason: Malformed::EmptyAuthor, index: 2, .. }
    ));
}

// === Change audit ===

#[test]
fn test_changes_list_old_and_new_keys() {
    let input = vec![
        entry("Smith:2020", "Smith, John", "2020", "The Great Idea"),
        entry("smith1999study", "John Smith", "1999", "A Study"),
    ];
    let result = normalize(&input, &SkipWords::default()).unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].index, 0);
    assert_eq!(result.changes[0].old_key, "Smith:2020");
    assert_eq!(result.changes[0].new_key, "smith2020great");
}

// === Parsed input ===

#[test]
fn test_duplicates_from_different_sources_converge() {
    let input = r#"
@article{Smith:2020aa,
    author = {Smith, John and Doe, Jane},
    title = {The Great Idea},
    year = 2020,
}

@article{smith_great_2020,
  author = "John Smith and Jane Doe",
  title = "{The} {Great} {Idea}",
  year = "2020",
  doi = "10.1000/great",
}
"#;
    let parsed = parse(input, &ParseOptions::with_common_strings());
    let result = normalize(&parsed.entries, &SkipWords::default()).unwrap();

    assert_eq!(result.entries[0].cite_key, "smith2020great");
    assert_eq!(result.entries[1].cite_key, "smith2020great");

    let collisions = result.collisions();
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].indices, vec![0, 1]);
}

// === Properties ===

fn arb_entry() -> impl Strategy<Value = BibTeXEntry> {
    (
        "[a-z]{1,8}",
        "[A-Z][a-z]{1,8}",
        "[A-Z][a-z]{1,8}",
        "[0-9]{4}",
        "[A-Za-z]{1,10}( [A-Za-z]{1,10}){1,4}",
        "[ -~]{0,20}",
    )
        .prop_map(|(key, first, last, year, title, note)| {
            let mut e = BibTeXEntry::new(key, BibTeXEntryType::Article);
            e.add_field("author", format!("{} {}", first, last));
            e.add_field("year", year);
            e.add_field("title", title);
            e.add_field("note", note);
            e
        })
}

proptest! {
    #[test]
    fn test_normalize_is_deterministic(entries in prop::collection::vec(arb_entry(), 0..8)) {
        let skip = SkipWords::default();
        let first = normalize(&entries, &skip);
        let second = normalize(&entries, &skip);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_preserves_order_and_fields(entries in prop::collection::vec(arb_entry(), 0..8)) {
        let result = normalize(&entries, &SkipWords::default());
        prop_assert!(result.is_ok(), "{:?}", result);
        let result = result.unwrap();
        prop_assert_eq!(result.entries.len(), entries.len());
        for (out, input) in result.entries.iter().zip(&entries) {
            prop_assert_eq!(&out.fields, &input.fields);
            prop_assert_eq!(&out.entry_type, &input.entry_type);
        }
    }

    #[test]
    fn test_key_depends_only_on_own_fields(a in arb_entry(), b in arb_entry()) {
        let skip = SkipWords::default();
        let alone = normalize(std::slice::from_ref(&a), &skip).unwrap();
        let together = normalize(&[b, a.clone()], &skip).unwrap();
        prop_assert_eq!(&alone.entries[0].cite_key, &together.entries[1].cite_key);
    }
}
