// Book and cover configuration.
//
// Same shape as the chart config: a serde struct whose `Default` holds the
// stock file names and texts, overridable from a JSON file in whole or in
// part. Colours are written as `#rrggbb` strings.

use crate::error::{BookError, Result};
use crate::pdf::Rgb;
use jazz_scales_music::naming::{DEFAULT_FILE_PREFIX, SINGLE_CHART_STEM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Directory holding the cover and chart PDFs; the book is written here too.
    pub output_dir: PathBuf,
    pub cover_file: String,
    pub toc_file: String,
    pub book_file: String,
    /// File name prefix of the per-key chart PDFs.
    pub key_pdf_prefix: String,
    /// The single C-instrument chart used when no per-key charts are wanted.
    pub content_file: String,
    pub content_label: String,
    /// TOC and bookmark title of a per-key chart; `{key}` is the key name.
    pub key_label_template: String,
    pub toc_heading: String,
    pub cover: CoverConfig,
}

impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            output_dir: PathBuf::from("out"),
            cover_file: "cover.pdf".to_string(),
            toc_file: "toc.pdf".to_string(),
            book_file: "Jazz-Scales-Book.pdf".to_string(),
            key_pdf_prefix: DEFAULT_FILE_PREFIX.to_string(),
            content_file: format!("{SINGLE_CHART_STEM}.pdf"),
            content_label: "C Instruments".to_string(),
            key_label_template: "Key of {key}".to_string(),
            toc_heading: "Table of Contents".to_string(),
            cover: CoverConfig::default(),
        }
    }
}

impl BookConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BookError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| BookError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cover_path(&self) -> PathBuf {
        self.output_dir.join(&self.cover_file)
    }

    pub fn toc_path(&self) -> PathBuf {
        self.output_dir.join(&self.toc_file)
    }

    pub fn book_path(&self) -> PathBuf {
        self.output_dir.join(&self.book_file)
    }

    pub fn content_path(&self) -> PathBuf {
        self.output_dir.join(&self.content_file)
    }

    pub fn key_label(&self, key_name: &str) -> String {
        self.key_label_template.replace("{key}", key_name)
    }
}

/// Texts and palette of the cover page. Empty strings are not drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    pub title: String,
    pub subtitle: String,
    pub instrument_line: String,
    pub author: String,
    pub role: String,
    pub organization: String,
    pub url: String,
    pub palette: CoverPalette,
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig {
            title: "JAZZ SCALES".to_string(),
            subtitle: "Practice Book".to_string(),
            instrument_line: "C instruments".to_string(),
            author: "George K. Thiruvathukal, PhD".to_string(),
            role: "Professor of Computer Science".to_string(),
            organization: "Loyola University Chicago".to_string(),
            url: "https://gkt.sh".to_string(),
            palette: CoverPalette::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverPalette {
    pub background: Rgb,
    pub staff: Rgb,
    pub notes: Rgb,
    pub title: Rgb,
    pub subtitle: Rgb,
    pub instrument_line: Rgb,
    pub author: Rgb,
    pub details: Rgb,
    pub url: Rgb,
    pub compiled: Rgb,
    pub band: Rgb,
}

impl Default for CoverPalette {
    fn default() -> Self {
        CoverPalette {
            background: Rgb::new(0x0f, 0x13, 0x20),
            staff: Rgb::new(0x6b, 0x77, 0x96),
            notes: Rgb::new(0xa4, 0xc2, 0xf4),
            title: Rgb::new(0xec, 0xf1, 0xff),
            subtitle: Rgb::new(0xaa, 0xb8, 0xdb),
            instrument_line: Rgb::new(0xcb, 0xd5, 0xf0),
            author: Rgb::new(0xe7, 0xec, 0xff),
            details: Rgb::new(0xcb, 0xd5, 0xf0),
            url: Rgb::new(0x9f, 0xc0, 0xff),
            compiled: Rgb::new(0x9f, 0xb0, 0xd8),
            band: Rgb::new(0x24, 0x31, 0x4b),
        }
    }
}
