// Filesystem-safe names for per-key output files.
//
// Key names carry `#` and `b`, neither of which belongs in a filename. They
// are spelled out as `sharp` / `flat`. Double accidentals are replaced
// before single ones so "##" becomes one token rather than two partial
// matches. None of the replacement tokens contain `#` or `b`, which makes
// `sanitize_key_name` idempotent and lets `unsanitize_key_name` invert it.
//
// The book assembler (`jazz_scales_book::collect`) uses the inverse to turn
// `jazz_scales_Bflat.pdf` back into "Bb" for its table of contents.

use std::path::{Path, PathBuf};

/// Default filename prefix for per-key charts.
pub const DEFAULT_FILE_PREFIX: &str = "jazz_scales_";

/// Default stem of the single C-instrument chart.
pub const SINGLE_CHART_STEM: &str = "jazz_scales";

const REPLACEMENTS: [(&str, &str); 4] = [
    ("##", "sharpsharp"),
    ("#", "sharp"),
    ("bb", "flatflat"),
    ("b", "flat"),
];

pub fn sanitize_key_name(name: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(name.to_string(), |acc, &(from, to)| acc.replace(from, to))
}

pub fn unsanitize_key_name(safe: &str) -> String {
    safe.replace("sharp", "#").replace("flat", "b")
}

/// `<prefix><sanitized key>`, without extension.
pub fn chart_file_stem(prefix: &str, key_name: &str) -> String {
    format!("{prefix}{}", sanitize_key_name(key_name))
}

/// `<base>.<extension>`. Unlike `Path::with_extension`, a `.` already in
/// the stem (from a configured prefix) is kept.
pub fn artifact_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Recover the display key name from a chart file stem, or `None` if the
/// stem does not carry the prefix.
pub fn key_name_from_file_stem(prefix: &str, stem: &str) -> Option<String> {
    stem.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .map(unsanitize_key_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_keeps_dotted_prefix() {
        let base = Path::new("out").join(chart_file_stem("scales.v2_", "Bb"));
        assert_eq!(artifact_path(&base, "ly"), Path::new("out/scales.v2_Bflat.ly"));
        assert_eq!(artifact_path(&base, "pdf"), Path::new("out/scales.v2_Bflat.pdf"));
    }

    #[test]
    fn test_sanitize_single_accidentals() {
        assert_eq!(sanitize_key_name("C"), "C");
        assert_eq!(sanitize_key_name("F#"), "Fsharp");
        assert_eq!(sanitize_key_name("Bb"), "Bflat");
    }

    #[test]
    fn test_sanitize_double_accidentals_first() {
        assert_eq!(sanitize_key_name("F##"), "Fsharpsharp");
        assert_eq!(sanitize_key_name("Bbb"), "Bflatflat");
        assert!(!sanitize_key_name("C##").contains('#'));
        assert!(!sanitize_key_name("Ebb").contains('b'));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["C", "C#", "Db", "F##", "Bbb", "Gb", "A#"] {
            let once = sanitize_key_name(name);
            assert_eq!(sanitize_key_name(&once), once, "{name}");
        }
    }

    #[test]
    fn test_unsanitize_inverts_sanitize() {
        for name in ["C", "C#", "Db", "F##", "Bbb", "Gb", "A#", "B"] {
            assert_eq!(unsanitize_key_name(&sanitize_key_name(name)), name);
        }
    }

    #[test]
    fn test_file_stem_round_trip() {
        let stem = chart_file_stem(DEFAULT_FILE_PREFIX, "Eb");
        assert_eq!(stem, "jazz_scales_Eflat");
        assert_eq!(
            key_name_from_file_stem(DEFAULT_FILE_PREFIX, &stem).as_deref(),
            Some("Eb")
        );
        assert_eq!(key_name_from_file_stem(DEFAULT_FILE_PREFIX, "cover"), None);
        assert_eq!(key_name_from_file_stem(DEFAULT_FILE_PREFIX, "jazz_scales_"), None);
    }
}
