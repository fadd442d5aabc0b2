// Jazz scale chart generator: CLI entry point.
//
// Writes one LilyPond chart per key of a cycle, and optionally engraves each
// to PDF and writes a companion MIDI file.
//
// Usage:
//   cargo run -p jazz_scales_music -- [--start KEY] [--step N] [--count N]
//     [--prefer auto|flats|sharps] [--anchor nearest|up|down]
//     [--mode major|minor] [--pdf] [--midi] [--tempo BPM]
//     [--author TEXT] [--license TEXT] [--out-dir DIR] [--config FILE]
//   cargo run -p jazz_scales_music -- --single [--pdf] [--midi] ...
//
// `--single` writes the one untransposed C-instrument chart
// (`jazz_scales.ly`) that `make-book --single` binds.
//
// An unknown start key exits non-zero before any file is written. Engraver
// failures are listed in the summary but do not change the exit status.

use anyhow::{Context, Result};
use clap::Parser;
use jazz_scales_music::config::ChartConfig;
use jazz_scales_music::engrave::LilyPond;
use jazz_scales_music::generate::{
    ArtifactStatus, GenerateRequest, KeyOutcome, generate_charts, generate_single_chart,
};
use jazz_scales_music::key::{AccidentalPreference, KeyMode, RegisterAnchor};
use jazz_scales_music::midi::MIN_TEMPO_BPM;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jazz-scales")]
#[command(about = "Generate jazz scale practice charts in every key")]
#[command(version)]
struct Args {
    /// Write only the C-instrument chart, with no key signature
    #[arg(long, conflicts_with_all = ["start", "step", "count", "prefer", "anchor", "mode"])]
    single: bool,

    /// Key of the first chart (C, F#, Bb, ...)
    #[arg(long, default_value = "C")]
    start: String,

    /// Semitones between successive keys; 5 walks the cycle of fourths
    #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
    step: i32,

    /// Number of keys to generate
    #[arg(long, default_value_t = 12)]
    count: usize,

    /// Spell keys with flats, sharps, or pick from the step
    #[arg(long, value_enum, default_value_t = AccidentalPreference::Auto)]
    prefer: AccidentalPreference,

    /// How each key's register is placed relative to C
    #[arg(long, value_enum, default_value_t = RegisterAnchor::Nearest)]
    anchor: RegisterAnchor,

    /// Key signature mode
    #[arg(long, value_enum, default_value_t = KeyMode::Major)]
    mode: KeyMode,

    /// Engrave each chart to PDF with LilyPond
    #[arg(long)]
    pdf: bool,

    /// Also write a MIDI file per key
    #[arg(long)]
    midi: bool,

    /// MIDI tempo in quarter notes per minute
    #[arg(long, value_parser = clap::value_parser!(u16).range(i64::from(MIN_TEMPO_BPM)..))]
    tempo: Option<u16>,

    /// Composer line printed in each chart header
    #[arg(long)]
    author: Option<String>,

    /// Copyright line printed in each chart header
    #[arg(long)]
    license: Option<String>,

    /// Output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON file overriding chart defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// LilyPond executable
    #[arg(long, env = "LILYPOND")]
    lilypond: Option<PathBuf>,
}

impl Args {
    fn chart_config(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ChartConfig::default(),
        };
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(tempo) = self.tempo {
            config.tempo_bpm = tempo;
        }
        if let Some(author) = &self.author {
            config.author = Some(author.clone());
        }
        if let Some(license) = &self.license {
            config.license = Some(license.clone());
        }
        if let Some(exe) = &self.lilypond {
            config.lilypond_executable = exe.clone();
        }
        Ok(config)
    }

    fn request(&self) -> GenerateRequest {
        GenerateRequest {
            start: self.start.clone(),
            step: self.step,
            count: self.count,
            preference: self.prefer,
            anchor: self.anchor,
            mode: self.mode,
            compile_pdf: self.pdf,
            write_midi: self.midi,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.chart_config()?;
    let request = args.request();
    let engraver = LilyPond::new(&config.lilypond_executable);

    let outcomes = if args.single {
        info!("Generating the C-instrument chart");
        vec![generate_single_chart(&request, &config, &engraver).context("Chart generation failed")?]
    } else {
        info!(
            start = %request.start,
            step = request.step,
            count = request.count,
            "Generating charts"
        );
        generate_charts(&request, &config, &engraver).context("Chart generation failed")?
    };

    print_written(&outcomes);
    print_summary(&outcomes);
    Ok(())
}

fn print_written(outcomes: &[KeyOutcome]) {
    println!("Wrote:");
    for outcome in outcomes {
        println!("  {}", outcome.lilypond.display());
        let artifacts = outcome.midi.iter().chain(&outcome.pdf);
        for path in artifacts.filter_map(|a| match a {
            ArtifactStatus::Written(path) => Some(path),
            ArtifactStatus::Missing { .. } => None,
        }) {
            println!("  {}", path.display());
        }
    }
}

fn print_summary(outcomes: &[KeyOutcome]) {
    let incomplete: Vec<&KeyOutcome> = outcomes.iter().filter(|o| !o.is_complete()).collect();
    println!();
    println!(
        "{} of {} keys complete.",
        outcomes.len() - incomplete.len(),
        outcomes.len()
    );
    for outcome in incomplete {
        println!("Key {}:", outcome.key.name);
        for artifact in outcome.midi.iter().chain(&outcome.pdf) {
            if let ArtifactStatus::Missing { path, diagnostic } = artifact {
                println!("  missing {}", path.display());
                for line in diagnostic.lines() {
                    println!("    {line}");
                }
            }
        }
    }
}
