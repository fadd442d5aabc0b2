// External engraver: turning `.ly` files into PDFs.
//
// The engraving itself is done by the LilyPond program, run synchronously
// as a subprocess. `Engraver` is the seam between the generation pipeline
// and that program so the pipeline can be exercised without LilyPond
// installed. An engraver failure, whether the binary is missing or it exits
// non-zero, is returned as an `EngraveError` carrying the tail of its
// diagnostic output; the caller records it per key and moves on.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Lines of compiler output kept for the per-key failure summary.
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum EngraveError {
    /// The engraver could not be started at all.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engraver ran and reported failure.
    #[error("{program} exited with status {code:?}")]
    Failed {
        program: String,
        code: Option<i32>,
        diagnostic: String,
    },
}

impl EngraveError {
    /// Short text for the run summary.
    pub fn diagnostic(&self) -> String {
        match self {
            EngraveError::Spawn { .. } => self.to_string(),
            EngraveError::Failed { diagnostic, .. } => {
                if diagnostic.is_empty() {
                    self.to_string()
                } else {
                    format!("{self}\n{diagnostic}")
                }
            }
        }
    }
}

/// Output captured from a successful engraver run.
#[derive(Debug, Clone, Default)]
pub struct EngraveLog {
    pub output: String,
}

/// Compiles a LilyPond source file into `<output_base>.pdf`.
pub trait Engraver {
    fn engrave(&self, source: &Path, output_base: &Path) -> Result<EngraveLog, EngraveError>;
}

/// The LilyPond command-line program.
#[derive(Debug, Clone)]
pub struct LilyPond {
    executable: PathBuf,
}

impl LilyPond {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        LilyPond {
            executable: executable.into(),
        }
    }

    fn program(&self) -> String {
        self.executable.display().to_string()
    }
}

impl Default for LilyPond {
    fn default() -> Self {
        LilyPond::new("lilypond")
    }
}

impl Engraver for LilyPond {
    fn engrave(&self, source: &Path, output_base: &Path) -> Result<EngraveLog, EngraveError> {
        let mut command = Command::new(&self.executable);
        command.arg("--pdf").arg("-o").arg(output_base).arg(source);
        debug!(?command, "Running engraver");

        let output = command.output().map_err(|source| EngraveError::Spawn {
            program: self.program(),
            source,
        })?;

        // LilyPond reports progress and errors on stderr.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(EngraveLog { output: text })
        } else {
            Err(EngraveError::Failed {
                program: self.program(),
                code: output.status.code(),
                diagnostic: diagnostic_tail(&text, DIAGNOSTIC_TAIL_LINES),
            })
        }
    }
}

/// The last `lines` non-blank lines of `text`, in order.
pub fn diagnostic_tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_tail_keeps_last_lines() {
        let text = "one\n\ntwo\nthree\n  \nfour\n";
        assert_eq!(diagnostic_tail(text, 2), "three\nfour");
        assert_eq!(diagnostic_tail(text, 10), "one\ntwo\nthree\nfour");
        assert_eq!(diagnostic_tail("", 3), "");
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let engraver = LilyPond::new(dir.path().join("no-such-lilypond"));
        let err = engraver
            .engrave(&dir.path().join("x.ly"), &dir.path().join("x"))
            .unwrap_err();
        assert!(matches!(err, EngraveError::Spawn { .. }), "{err:?}");
        assert!(err.diagnostic().contains("no-such-lilypond"));
    }

    #[test]
    fn test_failed_diagnostic_includes_tail() {
        let err = EngraveError::Failed {
            program: "lilypond".to_string(),
            code: Some(1),
            diagnostic: "x.ly:3:1: error: syntax error".to_string(),
        };
        let text = err.diagnostic();
        assert!(text.starts_with("lilypond exited with status Some(1)"));
        assert!(text.ends_with("syntax error"));
    }
}
