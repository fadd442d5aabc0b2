// Pitch classes, absolute pitches, and their spellings.
//
// Two pitch representations are used throughout the crate:
// - `PitchClass`: 0-11 under octave identity, 0 = C.
// - `Pitch`: an absolute semitone number with C4 (middle C) == 0. The scale
//   table spells pitches as text ("Eb", "C5") and they are parsed into this
//   form once, then transposed by plain integer addition.
//
// Spelling is always chosen by an `Accidentals` value (sharps or flats) that
// is resolved once per key, so a key's name, its `\key` signature token, and
// the spelling of every note in its chart agree with each other.

use crate::error::{MusicError, Result};
use serde::{Deserialize, Serialize};

/// A resolved enharmonic spelling preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidentals {
    Flats,
    Sharps,
}

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// LilyPond (dutch) note names, used for both `\key` and note spelling.
const SHARP_LY_TOKENS: [&str; 12] = [
    "c", "cis", "d", "dis", "e", "f", "fis", "g", "gis", "a", "ais", "b",
];
const FLAT_LY_TOKENS: [&str; 12] = [
    "c", "des", "d", "ees", "e", "f", "ges", "g", "aes", "a", "bes", "b",
];

/// Key names accepted as a starting key. Covers the common enharmonic
/// spellings of all twelve pitch classes.
const KEY_NAME_TABLE: [(&str, u8); 21] = [
    ("C", 0),
    ("B#", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("Fb", 4),
    ("F", 5),
    ("E#", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
    ("Cb", 11),
];

/// One of the twelve pitch classes, 0 = C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Reduce any semitone count to its pitch class. Negative values wrap
    /// upward, so `new(-1)` is B.
    pub fn new(semitones: i32) -> Self {
        PitchClass(semitones.rem_euclid(12) as u8)
    }

    /// Look up a key name such as "F#" or "Bb". Matching is exact and
    /// case-sensitive after trimming whitespace.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let name = name.trim();
        KEY_NAME_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, pc)| PitchClass(pc))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The pitch class `semitones` above this one (mod 12).
    pub fn shifted(self, semitones: i32) -> Self {
        PitchClass::new(i32::from(self.0) + semitones)
    }

    pub fn name(self, accidentals: Accidentals) -> &'static str {
        match accidentals {
            Accidentals::Flats => FLAT_NAMES[self.0 as usize],
            Accidentals::Sharps => SHARP_NAMES[self.0 as usize],
        }
    }

    pub fn ly_token(self, accidentals: Accidentals) -> &'static str {
        match accidentals {
            Accidentals::Flats => FLAT_LY_TOKENS[self.0 as usize],
            Accidentals::Sharps => SHARP_LY_TOKENS[self.0 as usize],
        }
    }
}

/// An absolute pitch in semitones, C4 == 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pitch(pub i32);

impl Pitch {
    /// MIDI note number of C4.
    pub const MIDDLE_C_MIDI: i32 = 60;

    /// Parse a spelling like "C", "Eb", "F#" or "C5".
    ///
    /// The letter is case-insensitive, the accidental is a single `#` or `b`,
    /// and a trailing digit sets the octave (default 4).
    pub fn parse(spelling: &str) -> Result<Self> {
        let invalid = || MusicError::InvalidPitch(spelling.to_string());
        let s = spelling.trim();

        let (core, octave) = match s.chars().last() {
            Some(c) if c.is_ascii_digit() => {
                let octave = c.to_digit(10).ok_or_else(invalid)? as i32;
                (&s[..s.len() - 1], octave)
            }
            Some(_) => (s, 4),
            None => return Err(invalid()),
        };

        let mut chars = core.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let letter_pc = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };
        let alteration = match chars.as_str() {
            "" => 0,
            "#" => 1,
            "b" | "B" => -1,
            _ => return Err(invalid()),
        };

        Ok(Pitch(12 * (octave - 4) + letter_pc + alteration))
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Pitch(self.0 + semitones)
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::new(self.0)
    }

    /// MIDI note number, or `None` if the pitch falls outside 0-127.
    pub fn to_midi(self) -> Option<u8> {
        u8::try_from(self.0 + Self::MIDDLE_C_MIDI)
            .ok()
            .filter(|&n| n <= 127)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_wraps_negative() {
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(-12).value(), 0);
        assert_eq!(PitchClass::new(29).value(), 5);
    }

    #[test]
    fn test_key_name_table_covers_enharmonics() {
        assert_eq!(PitchClass::from_key_name("C#"), PitchClass::from_key_name("Db"));
        assert_eq!(PitchClass::from_key_name("B#"), Some(PitchClass::C));
        assert_eq!(PitchClass::from_key_name("Cb").map(PitchClass::value), Some(11));
        assert_eq!(PitchClass::from_key_name(" Bb ").map(PitchClass::value), Some(10));
        assert_eq!(PitchClass::from_key_name("H"), None);
        assert_eq!(PitchClass::from_key_name("bb"), None);
    }

    #[test]
    fn test_every_pitch_class_has_a_name() {
        for pc in 0..12 {
            let pc = PitchClass::new(pc);
            let flat = pc.name(Accidentals::Flats);
            let sharp = pc.name(Accidentals::Sharps);
            assert_eq!(PitchClass::from_key_name(flat), Some(pc));
            assert_eq!(PitchClass::from_key_name(sharp), Some(pc));
        }
    }

    #[test]
    fn test_parse_defaults_to_octave_four() {
        assert_eq!(Pitch::parse("C").unwrap(), Pitch(0));
        assert_eq!(Pitch::parse("Eb").unwrap(), Pitch(3));
        assert_eq!(Pitch::parse("F#").unwrap(), Pitch(6));
        assert_eq!(Pitch::parse("B").unwrap(), Pitch(11));
    }

    #[test]
    fn test_parse_explicit_octave() {
        assert_eq!(Pitch::parse("C5").unwrap(), Pitch(12));
        assert_eq!(Pitch::parse("A3").unwrap(), Pitch(-3));
        assert_eq!(Pitch::parse("bb4").unwrap(), Pitch(10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Pitch::parse("").is_err());
        assert!(Pitch::parse("H").is_err());
        assert!(Pitch::parse("C##").is_err());
        assert!(Pitch::parse("5").is_err());
    }

    #[test]
    fn test_transpose_round_trip() {
        let p = Pitch::parse("Gb").unwrap();
        for k in -11..=11 {
            assert_eq!(p.transpose(k).transpose(-k), p);
        }
    }

    #[test]
    fn test_to_midi() {
        assert_eq!(Pitch(0).to_midi(), Some(60));
        assert_eq!(Pitch(-60).to_midi(), Some(0));
        assert_eq!(Pitch(67).to_midi(), Some(127));
        assert_eq!(Pitch(68).to_midi(), None);
        assert_eq!(Pitch(-61).to_midi(), None);
    }

    #[test]
    fn test_ly_tokens_follow_spelling() {
        let pc = PitchClass::new(3);
        assert_eq!(pc.ly_token(Accidentals::Flats), "ees");
        assert_eq!(pc.ly_token(Accidentals::Sharps), "dis");
        assert_eq!(PitchClass::new(6).name(Accidentals::Sharps), "F#");
    }
}
