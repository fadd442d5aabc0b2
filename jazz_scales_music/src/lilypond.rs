// LilyPond sheet music output from charts.
//
// Converts a `Chart` into a LilyPond (.ly) text file that the LilyPond
// typesetter engraves into a PDF. The whole chart is a single treble staff
// in 4/4 with the key's `\key` signature, which the C-instrument chart
// leaves out. Each bar becomes one beamed run of eighth notes with the scale
// name and chord symbol as markup above the first note and the step labels
// as markup below each note. Trailing rest slots are merged into the fewest
// rest values that fill them.
//
// Uses absolute pitches (not \relative) so octave placement follows the
// chart's pitch numbers exactly. Note names are spelled with the key's
// accidentals, the same table that produced its `\key` token.

use crate::chart::{Bar, Chart, Slot};
use crate::config::ChartConfig;
use crate::error::{MusicError, Result};
use crate::key::{KeyMode, ResolvedKey};
use crate::pitch::{Accidentals, Pitch};
use std::fmt::Write;
use std::path::Path;

/// Convert a pitch to a LilyPond absolute pitch string.
///
/// LilyPond's `c` with no octave marks = MIDI 48 (C3), so middle C
/// (`Pitch(0)`) is `c'`. Each `'` raises one octave, each `,` lowers one.
pub fn pitch_to_ly(pitch: Pitch, accidentals: Accidentals) -> String {
    let midi = pitch.0 + Pitch::MIDDLE_C_MIDI;
    let octave = midi.div_euclid(12) - 4;
    let mut result = pitch.pitch_class().ly_token(accidentals).to_string();
    let mark = if octave > 0 { '\'' } else { ',' };
    for _ in 0..octave.unsigned_abs() {
        result.push(mark);
    }
    result
}

/// A valid LilyPond duration: note value (in eighth-note slots) and its
/// text representation.
const DURATION_TABLE: [(usize, &str); 6] = [
    (8, "1"),  // whole note = 8 eighth-note slots
    (6, "2."), // dotted half
    (4, "2"),  // half note
    (3, "4."), // dotted quarter
    (2, "4"),  // quarter note
    (1, "8"),  // eighth note
];

/// Decompose a duration (in eighth-note slots) into a sequence of LilyPond
/// duration strings, largest first.
///
/// For example: 5 slots = "2" + "8".
pub fn decompose_duration(mut slots: usize) -> Vec<&'static str> {
    let mut parts = Vec::new();
    for &(value, name) in &DURATION_TABLE {
        while slots >= value {
            parts.push(name);
            slots -= value;
        }
    }
    parts
}

/// The `\key` command for a resolved key and mode.
pub fn key_command(key: &ResolvedKey, mode: KeyMode) -> String {
    format!("\\key {} \\{}", key.ly_token, mode.ly_command())
}

/// Escape text for use inside a double-quoted LilyPond string.
pub fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn markup(text: &str) -> String {
    format!("\\markup {{ \"{}\" }}", escape_string(text))
}

/// An event in a bar: a note, or a run of consecutive rest slots.
#[derive(Debug, Clone, PartialEq)]
enum BarEvent<'a> {
    Note { pitch: Pitch, label: Option<&'a str> },
    Rest { slots: usize },
}

/// Walk a bar's slots, merging consecutive rests.
fn collect_bar_events(bar: &Bar) -> Vec<BarEvent<'_>> {
    let mut events = Vec::new();
    for slot in &bar.slots {
        match slot {
            Slot::Note { pitch, label } => events.push(BarEvent::Note {
                pitch: *pitch,
                label: label.as_deref(),
            }),
            Slot::Rest => match events.last_mut() {
                Some(BarEvent::Rest { slots }) => *slots += 1,
                _ => events.push(BarEvent::Rest { slots: 1 }),
            },
        }
    }
    events
}

/// Render one bar as a LilyPond music expression (no trailing bar check).
pub fn render_bar(bar: &Bar, accidentals: Accidentals) -> String {
    let events = collect_bar_events(bar);
    let note_count = bar.note_count();
    let beamed = note_count >= 2;
    let mut tokens: Vec<String> = Vec::new();
    let mut note_index = 0;

    for event in &events {
        match event {
            BarEvent::Note { pitch, label } => {
                let mut token = format!("{}8", pitch_to_ly(*pitch, accidentals));
                if beamed && note_index == 0 {
                    token.push('[');
                }
                if beamed && note_index + 1 == note_count {
                    token.push(']');
                }
                if note_index == 0 {
                    let _ = write!(token, " ^{}", markup(&bar.scale_name));
                    if !bar.chord.is_empty() {
                        let _ = write!(token, " ^{}", markup(&bar.chord));
                    }
                }
                if let Some(label) = label {
                    let _ = write!(token, " _{}", markup(label));
                }
                tokens.push(token);
                note_index += 1;
            }
            BarEvent::Rest { slots } => {
                for dur in decompose_duration(*slots) {
                    tokens.push(format!("r{dur}"));
                }
            }
        }
    }

    tokens.join(" ")
}

/// Generate a complete LilyPond file for a chart.
pub fn chart_to_lilypond(chart: &Chart, config: &ChartConfig) -> String {
    let mut ly = String::new();
    let _ = writeln!(ly, "\\version \"{}\"\n", config.lilypond_version);

    // Header
    ly.push_str("\\header {\n");
    let _ = writeln!(
        ly,
        "  title = \\markup {{ \\bold \"{}\" }}",
        escape_string(&chart.title)
    );
    if let Some(author) = config.author.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(ly, "  composer = \"{}\"", escape_string(author));
    }
    if let Some(license) = config.license.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(ly, "  copyright = \"{}\"", escape_string(license));
    }
    ly.push_str("  tagline = \"\"\n}\n\n");

    // Paper
    let _ = write!(
        ly,
        "\\paper {{\n  system-system-spacing.basic-distance = #{}\n  top-system-spacing.basic-distance = #{}\n}}\n\n",
        config.system_distance, config.top_system_distance
    );

    // Score
    ly.push_str("\\score {\n  \\new Staff = \"Staff\" {\n    \\new Voice = \"Music\" {\n");
    ly.push_str("      \\time 4/4\n      \\clef \"treble\"\n");
    if chart.key_signature {
        let _ = writeln!(ly, "      {}", key_command(&chart.key, chart.mode));
    }
    for bar in &chart.bars {
        let _ = writeln!(ly, "      {} |", render_bar(bar, chart.key.accidentals));
        if bar.break_after {
            ly.push_str("      \\break\n");
        }
    }
    ly.push_str("    }\n  }\n  \\layout { }\n}\n");

    ly
}

/// Write a chart's LilyPond file.
pub fn write_lilypond(chart: &Chart, config: &ChartConfig, path: &Path) -> Result<()> {
    let ly = chart_to_lilypond(chart, config);
    std::fs::write(path, ly).map_err(|e| MusicError::io(path, e))
}
