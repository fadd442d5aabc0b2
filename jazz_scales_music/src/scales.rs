// The scale table: sixteen common jazz scales, all rooted on C.
//
// Each row gives the scale name, its pitches as text spellings (octave 4
// unless a digit says otherwise), the step label between each pair of
// consecutive tones (W = whole, H = half, W+H / m3 = minor third), and the
// chord the scale is usually played over. The table is never mutated;
// charts in other keys are produced by transposing the parsed pitches by a
// semitone offset and substituting the chord root.

use crate::error::Result;
use crate::pitch::Pitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleDef {
    pub name: &'static str,
    pub pitches: &'static [&'static str],
    pub intervals: &'static [&'static str],
    /// Chord symbol rooted on C.
    pub chord: &'static str,
}

pub const SCALES: &[ScaleDef] = &[
    ScaleDef {
        name: "Major (Ionian)",
        pitches: &["C", "D", "E", "F", "G", "A", "B", "C5"],
        intervals: &["W", "W", "H", "W", "W", "W", "H"],
        chord: "Cmaj7",
    },
    ScaleDef {
        name: "Natural Minor (Aeolian)",
        pitches: &["C", "D", "Eb", "F", "G", "Ab", "Bb", "C5"],
        intervals: &["W", "H", "W", "W", "H", "W", "W"],
        chord: "Cm7",
    },
    ScaleDef {
        name: "Harmonic Minor",
        pitches: &["C", "D", "Eb", "F", "G", "Ab", "B", "C5"],
        intervals: &["W", "H", "W", "W", "H", "W+H", "H"],
        chord: "Cm(maj7)",
    },
    ScaleDef {
        name: "Melodic Minor (Jazz)",
        pitches: &["C", "D", "Eb", "F", "G", "A", "B", "C5"],
        intervals: &["W", "H", "W", "W", "W", "W", "H"],
        chord: "Cm(maj7)",
    },
    ScaleDef {
        name: "Dominant 7th (Mixolydian)",
        pitches: &["C", "D", "E", "F", "G", "A", "Bb", "C5"],
        intervals: &["W", "W", "H", "W", "W", "H", "W"],
        chord: "C7",
    },
    ScaleDef {
        name: "Dorian",
        pitches: &["C", "D", "Eb", "F", "G", "A", "Bb", "C5"],
        intervals: &["W", "H", "W", "W", "W", "H", "W"],
        chord: "Cm7",
    },
    ScaleDef {
        name: "Phrygian",
        pitches: &["C", "Db", "Eb", "F", "G", "Ab", "Bb", "C5"],
        intervals: &["H", "W", "W", "W", "H", "W", "W"],
        chord: "Cm7(b9)",
    },
    ScaleDef {
        name: "Lydian",
        pitches: &["C", "D", "E", "F#", "G", "A", "B", "C5"],
        intervals: &["W", "W", "W", "H", "W", "W", "H"],
        chord: "Cmaj7(#11)",
    },
    ScaleDef {
        name: "Locrian",
        pitches: &["C", "Db", "Eb", "F", "Gb", "Ab", "Bb", "C5"],
        intervals: &["H", "W", "W", "H", "W", "W", "W"],
        chord: "Cm7b5",
    },
    ScaleDef {
        name: "Half-Dim #2 (Locrian \u{266e}2)",
        pitches: &["C", "D", "Eb", "F", "Gb", "Ab", "Bb", "C5"],
        intervals: &["W", "H", "W", "H", "W", "W", "W"],
        chord: "Cm7b5",
    },
    ScaleDef {
        name: "Whole Tone",
        pitches: &["C", "D", "E", "F#", "G#", "A#", "C5"],
        intervals: &["W", "W", "W", "W", "W", "W"],
        chord: "C7(#5)",
    },
    ScaleDef {
        name: "Octatonic (Half\u{2013}Whole)",
        pitches: &["C", "Db", "Eb", "E", "F#", "G", "A", "Bb"],
        intervals: &["H", "W", "H", "W", "H", "W", "H"],
        chord: "C7(b9)",
    },
    ScaleDef {
        name: "Octatonic (Whole\u{2013}Half)",
        pitches: &["C", "D", "Eb", "F", "Gb", "Ab", "A", "B"],
        intervals: &["W", "H", "W", "H", "W", "H", "W"],
        chord: "Cdim7",
    },
    ScaleDef {
        name: "Blues (minor)",
        pitches: &["C", "Eb", "F", "Gb", "G", "Bb", "C5"],
        intervals: &["m3", "W", "H", "H", "m3", "W"],
        chord: "Cm7",
    },
    ScaleDef {
        name: "Pentatonic Major",
        pitches: &["C", "D", "E", "G", "A", "C5"],
        intervals: &["W", "W", "W+H", "W", "W+H"],
        chord: "C6",
    },
    ScaleDef {
        name: "Pentatonic Minor",
        pitches: &["C", "Eb", "F", "G", "Bb", "C5"],
        intervals: &["W+H", "W", "W", "W+H", "W"],
        chord: "Cm",
    },
];

impl ScaleDef {
    /// The scale's pitches shifted by `offset` semitones. The source table
    /// is untouched.
    pub fn transposed_pitches(&self, offset: i32) -> Result<Vec<Pitch>> {
        self.pitches
            .iter()
            .map(|spelling| Pitch::parse(spelling).map(|p| p.transpose(offset)))
            .collect()
    }
}

/// Re-root a C-rooted chord symbol on `key_name`.
///
/// Only the leading root letter is replaced; the quality text after it
/// ("m7(b9)", "maj7(#11)") is copied byte for byte and is not re-spelled for
/// the new key.
pub fn transpose_chord_symbol(chord: &str, key_name: &str) -> String {
    let mut chars = chord.chars();
    match chars.next() {
        Some(root) if root.is_ascii_alphabetic() => format!("{key_name}{}", chars.as_str()),
        Some(_) => chord.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass;

    #[test]
    fn test_table_has_sixteen_rows() {
        assert_eq!(SCALES.len(), 16);
        assert_eq!(SCALES[0].name, "Major (Ionian)");
        assert_eq!(SCALES[15].name, "Pentatonic Minor");
    }

    #[test]
    fn test_every_row_has_one_more_pitch_than_step() {
        for scale in SCALES {
            assert_eq!(
                scale.pitches.len(),
                scale.intervals.len() + 1,
                "{}",
                scale.name
            );
            assert!(scale.pitches.len() <= 8, "{}", scale.name);
        }
    }

    #[test]
    fn test_every_row_is_rooted_on_c() {
        for scale in SCALES {
            let pitches = scale.transposed_pitches(0).unwrap();
            assert_eq!(pitches[0].pitch_class(), PitchClass::C, "{}", scale.name);
            assert!(scale.chord.starts_with('C'), "{}", scale.name);
        }
    }

    #[test]
    fn test_steps_match_labels() {
        for scale in SCALES {
            let pitches = scale.transposed_pitches(0).unwrap();
            for (pair, label) in pitches.windows(2).zip(scale.intervals) {
                let semis = pair[1].0 - pair[0].0;
                let expected = match *label {
                    "H" => 1,
                    "W" => 2,
                    "W+H" | "m3" => 3,
                    other => panic!("unexpected label {other}"),
                };
                assert_eq!(semis, expected, "{} {:?}", scale.name, pair);
            }
        }
    }

    #[test]
    fn test_transpose_preserves_structure() {
        let dorian = &SCALES[5];
        let c = dorian.transposed_pitches(0).unwrap();
        let g = dorian.transposed_pitches(-5).unwrap();
        for (a, b) in c.iter().zip(&g) {
            assert_eq!(b.0 - a.0, -5);
        }
        let back: Vec<_> = g.iter().map(|p| p.transpose(5)).collect();
        assert_eq!(back, c);
    }

    #[test]
    fn test_chord_symbol_keeps_quality_text() {
        assert_eq!(transpose_chord_symbol("Cm7(b9)", "F#"), "F#m7(b9)");
        assert_eq!(transpose_chord_symbol("Cmaj7(#11)", "Bb"), "Bbmaj7(#11)");
        assert_eq!(transpose_chord_symbol("C7", "G"), "G7");
        assert_eq!(transpose_chord_symbol("C", "Eb"), "Eb");
        assert_eq!(transpose_chord_symbol("", "Eb"), "");
    }
}
