// The chart: one key's worth of scale bars, ready for engraving.
//
// Every scale occupies exactly one 4/4 bar of eight eighth-note slots. The
// scale's tones fill the slots in order and any slots left over (pentatonic,
// blues and whole-tone scales have fewer than eight tones) are rests, so
// every bar has the same duration. Each note carries the label printed
// beneath it: a fixed placeholder under the first note, then the step label
// that leads into each later note.
//
// The single C-instrument chart is the same bars at offset zero, printed
// without a key signature so every accidental shows on its note.
//
// Bars are grouped two to a system: every second bar is flagged
// `break_after`, and the LilyPond writer turns that into a forced `\break`.
//
// The chart is the single source of truth for both outputs: `lilypond.rs`
// and `midi.rs` each walk it independently.

use crate::config::ChartConfig;
use crate::error::{MusicError, Result};
use crate::key::{KeyMode, RegisterAnchor, ResolvedKey};
use crate::pitch::{Accidentals, Pitch, PitchClass};
use crate::scales::{ScaleDef, transpose_chord_symbol};
use serde::Serialize;

/// Eighth-note slots in one 4/4 bar.
pub const SLOTS_PER_BAR: usize = 8;

/// Bars printed on each line of music.
pub const BARS_PER_SYSTEM: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Slot {
    Note { pitch: Pitch, label: Option<String> },
    Rest,
}

impl Slot {
    pub fn is_note(&self) -> bool {
        matches!(self, Slot::Note { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub scale_name: String,
    /// Chord symbol already re-rooted on the chart's key; may be empty.
    pub chord: String,
    /// Always `SLOTS_PER_BAR` long.
    pub slots: Vec<Slot>,
    /// Force a line break after this bar.
    pub break_after: bool,
}

impl Bar {
    pub fn notes(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Note { pitch, .. } => Some(*pitch),
            Slot::Rest => None,
        })
    }

    pub fn note_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_note()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub title: String,
    pub key: ResolvedKey,
    pub mode: KeyMode,
    /// Print a `\key` signature; off for the C-instrument chart.
    pub key_signature: bool,
    pub bars: Vec<Bar>,
}

/// Build one scale's bar, transposed by `key.offset`.
pub fn build_bar(scale: &ScaleDef, key: &ResolvedKey, placeholder: &str) -> Result<Bar> {
    let pitches = scale.transposed_pitches(key.offset)?;
    if pitches.len() > SLOTS_PER_BAR {
        return Err(MusicError::BarOverflow {
            scale: scale.name.to_string(),
            pitches: pitches.len(),
            slots: SLOTS_PER_BAR,
        });
    }

    let mut slots: Vec<Slot> = pitches
        .into_iter()
        .enumerate()
        .map(|(i, pitch)| {
            let label = if i == 0 {
                Some(placeholder)
            } else {
                scale.intervals.get(i - 1).copied()
            };
            Slot::Note {
                pitch,
                label: label.filter(|l| !l.is_empty()).map(str::to_string),
            }
        })
        .collect();
    slots.resize(SLOTS_PER_BAR, Slot::Rest);

    Ok(Bar {
        scale_name: scale.name.to_string(),
        chord: transpose_chord_symbol(scale.chord, key.name),
        slots,
        break_after: false,
    })
}

fn build_bars(key: &ResolvedKey, scales: &[ScaleDef], placeholder: &str) -> Result<Vec<Bar>> {
    let mut bars = Vec::with_capacity(scales.len());
    for (i, scale) in scales.iter().enumerate() {
        let mut bar = build_bar(scale, key, placeholder)?;
        bar.break_after = (i + 1) % BARS_PER_SYSTEM == 0;
        bars.push(bar);
    }
    Ok(bars)
}

/// Build the full chart for one key.
pub fn build_chart(
    key: &ResolvedKey,
    mode: KeyMode,
    scales: &[ScaleDef],
    config: &ChartConfig,
) -> Result<Chart> {
    Ok(Chart {
        title: config.title_for(key.name),
        key: *key,
        mode,
        key_signature: true,
        bars: build_bars(key, scales, &config.interval_placeholder)?,
    })
}

/// The untransposed chart for C instruments, titled `config.single_title`.
pub fn build_single_chart(scales: &[ScaleDef], config: &ChartConfig) -> Result<Chart> {
    let key = ResolvedKey::new(PitchClass::C, Accidentals::Flats, RegisterAnchor::Nearest);
    Ok(Chart {
        title: config.single_title.clone(),
        key,
        mode: KeyMode::Major,
        key_signature: false,
        bars: build_bars(&key, scales, &config.interval_placeholder)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::SCALES;

    fn key(pc: i32) -> ResolvedKey {
        ResolvedKey::new(PitchClass::new(pc), Accidentals::Flats, RegisterAnchor::Nearest)
    }

    fn labels(bar: &Bar) -> Vec<Option<&str>> {
        bar.slots
            .iter()
            .filter_map(|s| match s {
                Slot::Note { label, .. } => Some(label.as_deref()),
                Slot::Rest => None,
            })
            .collect()
    }

    #[test]
    fn test_major_bar_fills_all_slots() {
        let bar = build_bar(&SCALES[0], &key(0), "-").unwrap();
        assert_eq!(bar.slots.len(), SLOTS_PER_BAR);
        assert_eq!(bar.note_count(), 8);
        assert_eq!(bar.chord, "Cmaj7");
        assert_eq!(
            labels(&bar),
            [Some("-"), Some("W"), Some("W"), Some("H"), Some("W"), Some("W"), Some("W"), Some("H")]
        );
    }

    #[test]
    fn test_pentatonic_bar_is_padded_with_rests() {
        let bar = build_bar(&SCALES[14], &key(0), "-").unwrap();
        assert_eq!(bar.slots.len(), SLOTS_PER_BAR);
        assert_eq!(bar.note_count(), 6);
        assert_eq!(bar.slots[6], Slot::Rest);
        assert_eq!(bar.slots[7], Slot::Rest);
    }

    #[test]
    fn test_bar_is_transposed_by_key_offset() {
        // F with the nearest anchor sits 5 semitones up.
        let bar = build_bar(&SCALES[0], &key(5), "-").unwrap();
        let notes: Vec<_> = bar.notes().collect();
        assert_eq!(notes[0], Pitch(5));
        assert_eq!(notes[7], Pitch(17));
        assert_eq!(bar.chord, "Fmaj7");

        // G with the nearest anchor drops 5 semitones.
        let bar = build_bar(&SCALES[0], &key(7), "-").unwrap();
        assert_eq!(bar.notes().next(), Some(Pitch(-5)));
    }

    #[test]
    fn test_empty_placeholder_omits_first_label() {
        let bar = build_bar(&SCALES[0], &key(0), "").unwrap();
        assert_eq!(labels(&bar)[0], None);
    }

    #[test]
    fn test_oversized_scale_is_rejected() {
        let nine = ScaleDef {
            name: "Too Long",
            pitches: &["C", "D", "E", "F", "G", "A", "B", "C5", "D5"],
            intervals: &["W", "W", "H", "W", "W", "W", "H", "W"],
            chord: "C",
        };
        let err = build_bar(&nine, &key(0), "-").unwrap_err();
        assert!(matches!(err, MusicError::BarOverflow { pitches: 9, .. }));
    }

    #[test]
    fn test_chart_breaks_every_two_bars() {
        let chart = build_chart(&key(10), KeyMode::Major, SCALES, &ChartConfig::default()).unwrap();
        assert_eq!(chart.bars.len(), SCALES.len());
        assert_eq!(chart.title, "Common Jazz Scales in Key of Bb");
        for (i, bar) in chart.bars.iter().enumerate() {
            assert_eq!(bar.break_after, i % 2 == 1, "bar {i}");
        }
    }

    #[test]
    fn test_single_chart_is_c_without_key_signature() {
        let chart = build_single_chart(SCALES, &ChartConfig::default()).unwrap();
        assert_eq!(chart.title, "Jazz Scales \u{2013} C Instruments");
        assert!(!chart.key_signature);
        assert_eq!(chart.key.offset, 0);
        assert_eq!(chart.bars[0].chord, "Cmaj7");
        assert_eq!(chart.bars[0].notes().next(), Some(Pitch(0)));
        assert_eq!(chart.bars.len(), SCALES.len());
    }
}
