// Multi-key chart generation.
//
// One call produces a chart per key of the requested cycle:
//   validate config -> resolve keys -> create output dir -> for each key:
//     build chart -> write .ly -> [write .mid] -> [engrave .pdf]
//
// Keys are resolved before anything touches the filesystem, so a bad
// starting key aborts the run with no output at all. Once files are being
// written, a failing companion output does not stop the run: each key gets
// a `KeyOutcome` that records which artifacts exist and, for missing ones,
// why. Only a `.ly` file that cannot be written is fatal.
//
// `generate_single_chart` runs the same per-chart steps once for the
// untransposed C-instrument chart.

use crate::chart::{Chart, build_chart, build_single_chart};
use crate::config::ChartConfig;
use crate::engrave::Engraver;
use crate::error::{MusicError, Result};
use crate::key::{AccidentalPreference, KeyMode, RegisterAnchor, ResolvedKey, resolve_keys};
use crate::lilypond::write_lilypond;
use crate::midi::write_midi;
use crate::naming::{artifact_path, chart_file_stem};
use crate::scales::SCALES;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What to generate. Mirrors the command-line surface of `jazz-scales`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub start: String,
    pub step: i32,
    pub count: usize,
    pub preference: AccidentalPreference,
    pub anchor: RegisterAnchor,
    pub mode: KeyMode,
    pub compile_pdf: bool,
    pub write_midi: bool,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        GenerateRequest {
            start: "C".to_string(),
            step: 5,
            count: 12,
            preference: AccidentalPreference::Auto,
            anchor: RegisterAnchor::Nearest,
            mode: KeyMode::Major,
            compile_pdf: false,
            write_midi: false,
        }
    }
}

/// Whether an expected output file was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written(PathBuf),
    Missing { path: PathBuf, diagnostic: String },
}

impl ArtifactStatus {
    pub fn is_written(&self) -> bool {
        matches!(self, ArtifactStatus::Written(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            ArtifactStatus::Written(path) | ArtifactStatus::Missing { path, .. } => path,
        }
    }
}

/// Result of charting one key.
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub key: ResolvedKey,
    pub lilypond: PathBuf,
    /// `None` when MIDI output was not requested.
    pub midi: Option<ArtifactStatus>,
    /// `None` when PDF output was not requested.
    pub pdf: Option<ArtifactStatus>,
}

impl KeyOutcome {
    /// True when every requested artifact was written.
    pub fn is_complete(&self) -> bool {
        self.midi.iter().chain(&self.pdf).all(ArtifactStatus::is_written)
    }
}

/// Generate charts for every key of the request.
pub fn generate_charts(
    request: &GenerateRequest,
    config: &ChartConfig,
    engraver: &dyn Engraver,
) -> Result<Vec<KeyOutcome>> {
    config.validate()?;
    let keys = resolve_keys(
        &request.start,
        request.step,
        request.count,
        request.preference,
        request.anchor,
    )?;

    create_output_dir(config)?;

    let mut outcomes = Vec::with_capacity(keys.len());
    for key in &keys {
        let chart = build_chart(key, request.mode, SCALES, config)?;
        let base = config
            .output_dir
            .join(chart_file_stem(&config.file_prefix, key.name));
        outcomes.push(write_chart(&chart, &base, request, config, engraver)?);
    }
    Ok(outcomes)
}

/// Generate the C-instrument chart, `<output_dir>/<single_file_stem>.ly`.
/// The request's key cycle and mode are not used.
pub fn generate_single_chart(
    request: &GenerateRequest,
    config: &ChartConfig,
    engraver: &dyn Engraver,
) -> Result<KeyOutcome> {
    config.validate()?;
    let chart = build_single_chart(SCALES, config)?;
    create_output_dir(config)?;
    let base = config.output_dir.join(&config.single_file_stem);
    write_chart(&chart, &base, request, config, engraver)
}

fn create_output_dir(config: &ChartConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).map_err(|e| MusicError::io(&config.output_dir, e))
}

fn write_chart(
    chart: &Chart,
    base: &Path,
    request: &GenerateRequest,
    config: &ChartConfig,
    engraver: &dyn Engraver,
) -> Result<KeyOutcome> {
    let key = &chart.key;
    let lilypond = artifact_path(base, "ly");
    write_lilypond(chart, config, &lilypond)?;
    info!(key = key.name, path = %lilypond.display(), "Wrote LilyPond chart");

    let midi = request
        .write_midi
        .then(|| write_companion_midi(chart, config.tempo_bpm, base));

    let pdf = request
        .compile_pdf
        .then(|| engrave_key(key, &lilypond, base, engraver));

    Ok(KeyOutcome {
        key: *key,
        lilypond,
        midi,
        pdf,
    })
}

fn write_companion_midi(chart: &Chart, tempo_bpm: u16, base: &Path) -> ArtifactStatus {
    let path = artifact_path(base, "mid");
    match write_midi(chart, tempo_bpm, &path) {
        Ok(()) => {
            info!(key = chart.key.name, path = %path.display(), "Wrote MIDI");
            ArtifactStatus::Written(path)
        }
        Err(err) => {
            warn!(key = chart.key.name, path = %path.display(), error = %err, "MIDI not written");
            ArtifactStatus::Missing {
                path,
                diagnostic: err.to_string(),
            }
        }
    }
}

fn engrave_key(
    key: &ResolvedKey,
    source: &Path,
    base: &Path,
    engraver: &dyn Engraver,
) -> ArtifactStatus {
    let path = artifact_path(base, "pdf");
    let diagnostic = match engraver.engrave(source, base) {
        Ok(_) if path.exists() => {
            info!(key = key.name, path = %path.display(), "Engraved PDF");
            return ArtifactStatus::Written(path);
        }
        Ok(log) => format!(
            "engraver reported success but produced no PDF\n{}",
            crate::engrave::diagnostic_tail(&log.output, crate::engrave::DIAGNOSTIC_TAIL_LINES)
        ),
        Err(err) => err.diagnostic(),
    };
    warn!(key = key.name, path = %path.display(), "PDF not produced");
    ArtifactStatus::Missing { path, diagnostic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engrave::{EngraveError, EngraveLog};

    /// Engraver that writes an empty PDF for every key except those listed.
    struct FakeEngraver {
        fail_for: Vec<&'static str>,
    }

    impl Engraver for FakeEngraver {
        fn engrave(&self, source: &Path, output_base: &Path) -> std::result::Result<EngraveLog, EngraveError> {
            let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
            if self.fail_for.iter().any(|s| stem.ends_with(s)) {
                return Err(EngraveError::Failed {
                    program: "fake".to_string(),
                    code: Some(1),
                    diagnostic: format!("{stem}.ly:1:1: error"),
                });
            }
            std::fs::write(artifact_path(output_base, "pdf"), b"%PDF-1.5\n").unwrap();
            Ok(EngraveLog::default())
        }
    }

    fn config_in(dir: &Path) -> ChartConfig {
        ChartConfig {
            output_dir: dir.join("out"),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_unknown_key_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let request = GenerateRequest {
            start: "X#".to_string(),
            ..GenerateRequest::default()
        };
        let engraver = FakeEngraver { fail_for: vec![] };
        let err = generate_charts(&request, &config, &engraver).unwrap_err();
        assert!(matches!(err, MusicError::UnknownKey(_)));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_engraver_failure_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let request = GenerateRequest {
            count: 3,
            compile_pdf: true,
            ..GenerateRequest::default()
        };
        // C, F, Bb: fail on F.
        let engraver = FakeEngraver { fail_for: vec!["_F"] };
        let outcomes = generate_charts(&request, &config, &engraver).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_complete());
        assert!(!outcomes[1].is_complete());
        assert!(outcomes[2].is_complete());
        match outcomes[1].pdf.as_ref().unwrap() {
            ArtifactStatus::Missing { diagnostic, path } => {
                assert!(diagnostic.contains("error"), "{diagnostic}");
                assert!(path.ends_with("jazz_scales_F.pdf"));
            }
            other => panic!("expected missing PDF, got {other:?}"),
        }
        assert!(outcomes[2].lilypond.ends_with("jazz_scales_Bflat.ly"));
    }

    #[test]
    fn test_success_without_pdf_is_missing() {
        struct SilentEngraver;
        impl Engraver for SilentEngraver {
            fn engrave(&self, _: &Path, _: &Path) -> std::result::Result<EngraveLog, EngraveError> {
                Ok(EngraveLog {
                    output: "Processing...\n".to_string(),
                })
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let request = GenerateRequest {
            count: 1,
            compile_pdf: true,
            ..GenerateRequest::default()
        };
        let outcomes = generate_charts(&request, &config, &SilentEngraver).unwrap();
        let pdf = outcomes[0].pdf.as_ref().unwrap();
        assert!(!pdf.is_written());
        assert!(pdf.path().ends_with("jazz_scales_C.pdf"));
    }

    #[test]
    fn test_midi_written_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let request = GenerateRequest {
            count: 2,
            write_midi: true,
            ..GenerateRequest::default()
        };
        let outcomes =
            generate_charts(&request, &config, &FakeEngraver { fail_for: vec![] }).unwrap();
        for outcome in &outcomes {
            let midi = outcome.midi.as_ref().unwrap();
            assert!(midi.is_written());
            assert!(midi.path().exists());
            assert!(outcome.pdf.is_none());
        }
    }

    #[test]
    fn test_unwritable_midi_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        // A directory where F's MIDI file should go.
        std::fs::create_dir_all(config.output_dir.join("jazz_scales_F.mid")).unwrap();
        let request = GenerateRequest {
            count: 3,
            write_midi: true,
            ..GenerateRequest::default()
        };
        let outcomes =
            generate_charts(&request, &config, &FakeEngraver { fail_for: vec![] }).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_complete());
        match outcomes[1].midi.as_ref().unwrap() {
            ArtifactStatus::Missing { path, diagnostic } => {
                assert!(path.ends_with("jazz_scales_F.mid"));
                assert!(diagnostic.contains("jazz_scales_F.mid"), "{diagnostic}");
            }
            other => panic!("expected missing MIDI, got {other:?}"),
        }
        assert!(outcomes[2].is_complete());
        assert!(config.output_dir.join("jazz_scales_Bflat.ly").exists());
        assert!(config.output_dir.join("jazz_scales_Bflat.mid").exists());
    }

    #[test]
    fn test_unstorable_tempo_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            tempo_bpm: 2,
            ..config_in(dir.path())
        };
        let request = GenerateRequest {
            write_midi: true,
            ..GenerateRequest::default()
        };
        let err = generate_charts(&request, &config, &FakeEngraver { fail_for: vec![] })
            .unwrap_err();
        assert!(matches!(err, MusicError::TempoOutOfRange(2)));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_dotted_prefix_survives_in_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            file_prefix: "scales.v2_".to_string(),
            ..config_in(dir.path())
        };
        let request = GenerateRequest {
            count: 1,
            compile_pdf: true,
            write_midi: true,
            ..GenerateRequest::default()
        };
        let outcomes =
            generate_charts(&request, &config, &FakeEngraver { fail_for: vec![] }).unwrap();
        let outcome = &outcomes[0];
        assert!(outcome.lilypond.ends_with("scales.v2_C.ly"));
        assert!(outcome.midi.as_ref().unwrap().path().ends_with("scales.v2_C.mid"));
        assert!(outcome.pdf.as_ref().unwrap().path().ends_with("scales.v2_C.pdf"));
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_single_chart_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let request = GenerateRequest {
            start: "F#".to_string(),
            compile_pdf: true,
            ..GenerateRequest::default()
        };
        let outcome =
            generate_single_chart(&request, &config, &FakeEngraver { fail_for: vec![] }).unwrap();
        assert!(outcome.lilypond.ends_with("jazz_scales.ly"));
        assert!(outcome.pdf.as_ref().unwrap().path().ends_with("jazz_scales.pdf"));
        assert!(outcome.is_complete());
        assert_eq!(outcome.key.name, "C");
    }
}
