// Error types for chart generation.
//
// `MusicError` covers everything that can stop a run: a bad starting key,
// a malformed pitch in the scale table, a config file that does not parse
// or holds an unusable tempo, and filesystem failures while writing `.ly`
// files. Per-key companion outputs are different: a `.mid` that cannot be
// written or a PDF the external engraver did not produce is reported in
// that key's outcome without aborting the run (see `generate.rs`).

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MusicError>;

#[derive(Debug, Error)]
pub enum MusicError {
    /// The starting key is not in the enharmonic name table.
    #[error("Unknown start key: {0}")]
    UnknownKey(String),

    #[error("Invalid pitch spelling: {0:?}")]
    InvalidPitch(String),

    /// A scale has more tones than a bar has eighth-note slots.
    #[error("Scale {scale:?} has {pitches} pitches but a bar holds only {slots}")]
    BarOverflow {
        scale: String,
        pitches: usize,
        slots: usize,
    },

    #[error("Pitch {0} is outside the MIDI range")]
    PitchOutOfRange(i32),

    /// Zero, or so slow that a quarter note overflows the MIDI tempo field.
    #[error("Tempo {0} BPM is outside the range a MIDI file can store")]
    TempoOutOfRange(u16),

    #[error("Failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MusicError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MusicError::Io {
            path: path.into(),
            source,
        }
    }
}
