//! Writing the cleaned bibliography

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::OutputError;

/// Sibling path for the cleaned file: `refs/mybib.bib` becomes
/// `refs/mybib_clean.bib`
pub fn clean_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}_clean.bib");

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write `contents` to `path` all at once
///
/// The text goes to a temporary file in the destination directory which is
/// renamed over `path` only after it has been fully written, so a failed run
/// never leaves a truncated output behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), OutputError> {
    let wrap = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(wrap)?;
    tmp.write_all(contents.as_bytes()).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_path() {
        assert_eq!(
            clean_output_path(Path::new("/data/refs/mybib.bib")),
            PathBuf::from("/data/refs/mybib_clean.bib")
        );
        assert_eq!(
            clean_output_path(Path::new("mybib.bib")),
            PathBuf::from("mybib_clean.bib")
        );
        assert_eq!(
            clean_output_path(Path::new("refs/library.txt")),
            PathBuf::from("refs/library_clean.bib")
        );
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bib");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, "new contents").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new contents");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bib");

        let err = write_atomic(&path, "text").unwrap_err();
        assert!(err.to_string().contains("out.bib"));
        assert!(!path.exists());
    }
}
