//! fix-bibkeys - command-line front end
//!
//! Reads a `.bib` file, rewrites every cite key to
//! `<surname><year><titleword>` and writes the result next to the input as
//! `<stem>_clean.bib`. Each changed key is listed on the audit writer (new
//! key, then old key) so the edits can be reviewed by hand.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use bibkeys_bibtex::{format_bibliography, parse, BibTeXParseError};
use bibkeys_core::{
    clean_output_path, normalize_all, write_atomic, Collision, ConfigError, KeyChange, KeyError,
    NormalizerConfig, OutputError, SkipWords,
};

/// Command-line arguments
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "fix-bibkeys",
    version,
    about = "Change all keys in a .bib file to <firstauthorlastname><year><first meaningful word of title>"
)]
pub struct Args {
    /// Path to bib file to clean
    pub bib_path: PathBuf,

    /// Title words to skip when picking the meaningful word, as a list literal
    #[arg(long = "skip", value_name = "LIST", default_value = "['a','the','an']")]
    pub skip_words: String,
}

impl Args {
    /// Build the run configuration from the arguments
    pub fn config(&self) -> Result<NormalizerConfig, ConfigError> {
        Ok(NormalizerConfig::new(SkipWords::parse_list(&self.skip_words)?))
    }
}

/// Everything that can stop a run
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not read {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}:\n{}", .path.display(), list_parse_errors(.errors))]
    ParseFailure {
        path: PathBuf,
        errors: Vec<BibTeXParseError>,
    },

    #[error("{} entries have no usable cite key:\n{}", .0.len(), list_key_errors(.0))]
    MalformedRecords(Vec<KeyError>),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("failed to write audit listing: {0}")]
    Audit(#[from] std::io::Error),
}

fn list_parse_errors(errors: &[BibTeXParseError]) -> String {
    errors
        .iter()
        .map(|e| format!("  line {}: {}", e.line, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_key_errors(errors: &[KeyError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub output_path: PathBuf,
    pub entries: usize,
    pub changes: Vec<KeyChange>,
    pub collisions: Vec<Collision>,
}

/// Clean the file named by `args`, listing changed keys on `audit`
///
/// Nothing is written unless every entry received a key.
pub fn run(args: &Args, audit: &mut impl Write) -> Result<Summary, CliError> {
    let config = args.config()?;
    clean_file(&args.bib_path, &config, audit)
}

/// Clean one bibliography file with an explicit configuration
pub fn clean_file(
    path: &Path,
    config: &NormalizerConfig,
    audit: &mut impl Write,
) -> Result<Summary, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = parse(&text, &config.parse_options());
    if !parsed.errors.is_empty() {
        return Err(CliError::ParseFailure {
            path: path.to_path_buf(),
            errors: parsed.errors,
        });
    }
    tracing::debug!("Parsed {} entries from {:?}", parsed.entries.len(), path);

    let normalized =
        normalize_all(&parsed.entries, &config.skip_words).map_err(CliError::MalformedRecords)?;

    for change in &normalized.changes {
        writeln!(audit, "{}\n{}\n\n", change.new_key, change.old_key)?;
    }

    let collisions = normalized.collisions();
    for collision in &collisions {
        tracing::warn!(
            "{} entries share the key {} (entries {:?})",
            collision.indices.len(),
            collision.key,
            collision.indices
        );
    }

    let output_path = clean_output_path(path);
    let contents = format_bibliography(&parsed.preambles, &parsed.strings, &normalized.entries);
    write_atomic(&output_path, &contents)?;

    tracing::info!(
        "Rewrote {} of {} keys into {:?}",
        normalized.changes.len(),
        normalized.entries.len(),
        output_path
    );

    Ok(Summary {
        output_path,
        entries: normalized.entries.len(),
        changes: normalized.changes,
        collisions,
    })
}
