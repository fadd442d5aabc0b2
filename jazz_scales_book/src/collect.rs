// Finding the per-key chart PDFs for a book.

use crate::error::{BookError, Result};
use jazz_scales_music::naming::key_name_from_file_stem;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPdf {
    /// Display name recovered from the file name, e.g. "Bb".
    pub key_name: String,
    pub path: PathBuf,
}

/// All `<prefix><key>.pdf` files directly inside `dir`, ordered by key name
/// (plain string order, so "Ab" before "B") and then by path.
///
/// A missing directory or one without any matching file is `NoKeyPdfs`.
pub fn collect_key_pdfs(dir: &Path, prefix: &str) -> Result<Vec<KeyPdf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BookError::NoKeyPdfs(dir.to_path_buf()));
        }
        Err(e) => return Err(BookError::io(dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BookError::io(dir, e))?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "pdf") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(key_name) = key_name_from_file_stem(prefix, stem) {
            debug!(key = %key_name, path = %path.display(), "Found key PDF");
            found.push(KeyPdf { key_name, path });
        }
    }

    if found.is_empty() {
        return Err(BookError::NoKeyPdfs(dir.to_path_buf()));
    }
    found.sort_by(|a, b| a.key_name.cmp(&b.key_name).then_with(|| a.path.cmp(&b.path)));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.5\n").unwrap();
    }

    #[test]
    fn test_collects_and_sorts_by_key_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "jazz_scales_F.pdf",
            "jazz_scales_Bflat.pdf",
            "jazz_scales_C.pdf",
            "jazz_scales_Fsharp.pdf",
            "jazz_scales_Aflat.pdf",
            "jazz_scales_C.ly",
            "cover.pdf",
            "jazz_scales.pdf",
        ] {
            touch(dir.path(), name);
        }
        let pdfs = collect_key_pdfs(dir.path(), "jazz_scales_").unwrap();
        let keys: Vec<&str> = pdfs.iter().map(|p| p.key_name.as_str()).collect();
        assert_eq!(keys, ["Ab", "Bb", "C", "F", "F#"]);
        assert!(pdfs[1].path.ends_with("jazz_scales_Bflat.pdf"));
    }

    #[test]
    fn test_empty_or_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cover.pdf");
        let err = collect_key_pdfs(dir.path(), "jazz_scales_").unwrap_err();
        assert!(matches!(err, BookError::NoKeyPdfs(_)));

        let missing = dir.path().join("nope");
        let err = collect_key_pdfs(&missing, "jazz_scales_").unwrap_err();
        assert!(err.to_string().contains("nope"), "{err}");
    }
}
