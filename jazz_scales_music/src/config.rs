// Data-driven chart configuration.
//
// Every tunable of chart generation lives in `ChartConfig`: output location
// and file naming, the title template, LilyPond paper spacing, the external
// engraver executable, the MIDI tempo, and the author/license strings
// printed in each chart's header. `Default` holds the stock values; a JSON
// file may override any subset of them (`#[serde(default)]`), and command
// line flags in `main.rs` override the file.

use crate::error::{MusicError, Result};
use crate::naming::{DEFAULT_FILE_PREFIX, SINGLE_CHART_STEM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Directory that receives `.ly`, `.pdf` and `.mid` files.
    pub output_dir: PathBuf,
    pub file_prefix: String,
    /// Chart title; `{key}` is replaced with the key name.
    pub title_template: String,
    /// File stem and title of the single C-instrument chart.
    pub single_file_stem: String,
    pub single_title: String,
    pub lilypond_version: String,
    /// `system-system-spacing.basic-distance` in the `\paper` block.
    pub system_distance: u32,
    /// `top-system-spacing.basic-distance` in the `\paper` block.
    pub top_system_distance: u32,
    /// Label under the first note of each scale, which has no preceding step.
    pub interval_placeholder: String,
    pub lilypond_executable: PathBuf,
    pub tempo_bpm: u16,
    pub author: Option<String>,
    pub license: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            output_dir: PathBuf::from("out"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            title_template: "Common Jazz Scales in Key of {key}".to_string(),
            single_file_stem: SINGLE_CHART_STEM.to_string(),
            single_title: "Jazz Scales \u{2013} C Instruments".to_string(),
            lilypond_version: "2.24.0".to_string(),
            system_distance: 24,
            top_system_distance: 18,
            interval_placeholder: "-".to_string(),
            lilypond_executable: PathBuf::from("lilypond"),
            tempo_bpm: 120,
            author: None,
            license: Some("Creative Commons 4.0 International".to_string()),
        }
    }
}

impl ChartConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MusicError::io(path, e))?;
        Self::from_json(&text).map_err(|source| MusicError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reject values that would only fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        crate::midi::tempo_microseconds(self.tempo_bpm)?;
        Ok(())
    }

    pub fn title_for(&self, key_name: &str) -> String {
        self.title_template.replace("{key}", key_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ChartConfig::from_json(r#"{ "tempo_bpm": 90, "author": "A. Player" }"#)
            .unwrap();
        assert_eq!(config.tempo_bpm, 90);
        assert_eq!(config.author.as_deref(), Some("A. Player"));
        assert_eq!(config.system_distance, 24);
        assert_eq!(config.file_prefix, DEFAULT_FILE_PREFIX);
    }

    #[test]
    fn test_title_template() {
        let config = ChartConfig::default();
        assert_eq!(config.title_for("Bb"), "Common Jazz Scales in Key of Bb");
    }

    #[test]
    fn test_validate_rejects_unstorable_tempo() {
        assert!(ChartConfig::default().validate().is_ok());
        let config = ChartConfig::from_json(r#"{ "tempo_bpm": 3 }"#).unwrap();
        assert!(matches!(config.validate(), Err(MusicError::TempoOutOfRange(3))));
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ChartConfig::load(&path).unwrap_err();
        assert!(matches!(err, MusicError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChartConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MusicError::Io { .. }));
    }
}
