//! BibTeX entry data structures

/// BibTeX entry type
///
/// Types outside the standard set are kept verbatim in `Other` so they are
/// written back the way they were read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    Other(String),
}

impl BibTeXEntryType {
    /// Parse an entry type from a string (case-insensitive)
    ///
    /// Unknown types keep the spelling they were given.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Convert entry type to its BibTeX spelling (lowercase for known types)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Software => "software",
            Self::Dataset => "dataset",
            Self::Other(name) => name,
        }
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry
///
/// Fields keep the order and spelling they had in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    /// Create a new BibTeX entry
    pub fn new(cite_key: String, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key,
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Add a field to the entry
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    /// Copy of this entry under a different cite key
    pub fn with_cite_key(&self, cite_key: impl Into<String>) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type: self.entry_type.clone(),
            fields: self.fields.clone(),
        }
    }

    /// Get the title field
    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    /// Get the author field
    pub fn author(&self) -> Option<&str> {
        self.get_field("author")
    }

    /// Get the year field
    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }

    /// Get the journal field
    pub fn journal(&self) -> Option<&str> {
        self.get_field("journal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_parsing() {
        assert_eq!(
            BibTeXEntryType::from_str("article"),
            BibTeXEntryType::Article
        );
        assert_eq!(
            BibTeXEntryType::from_str("ARTICLE"),
            BibTeXEntryType::Article
        );
        assert_eq!(
            BibTeXEntryType::from_str("inproceedings"),
            BibTeXEntryType::InProceedings
        );
        assert_eq!(
            BibTeXEntryType::from_str("Conference"),
            BibTeXEntryType::Other("Conference".to_string())
        );
    }

    #[test]
    fn test_other_type_round_trips_spelling() {
        let ty = BibTeXEntryType::from_str("Patent");
        assert_eq!(ty.as_str(), "Patent");
    }

    #[test]
    fn test_entry_field_access() {
        let mut entry = BibTeXEntry::new("Smith2024".to_string(), BibTeXEntryType::Article);
        entry.add_field("title", "A Great Paper");
        entry.add_field("Author", "John Smith");
        entry.add_field("YEAR", "2024");

        assert_eq!(entry.title(), Some("A Great Paper"));
        assert_eq!(entry.author(), Some("John Smith"));
        assert_eq!(entry.year(), Some("2024"));
        assert_eq!(entry.journal(), None);
    }

    #[test]
    fn test_with_cite_key_leaves_original_untouched() {
        let mut entry = BibTeXEntry::new("old".to_string(), BibTeXEntryType::Book);
        entry.add_field("title", "Book");

        let renamed = entry.with_cite_key("new");
        assert_eq!(renamed.cite_key, "new");
        assert_eq!(renamed.fields, entry.fields);
        assert_eq!(renamed.entry_type, entry.entry_type);
        assert_eq!(entry.cite_key, "old");
    }
}
