// Key cycle resolution: which keys to chart, how to spell them, and where
// to put them on the staff.
//
// A run starts from a named key and walks the circle by a fixed semitone
// step (5 = ascending fourths, 7 = fifths, -1 = chromatic descent, ...).
// Every visited key is resolved into a `ResolvedKey` carrying:
// - the display name ("Bb", "F#"), spelled with one `Accidentals` choice
//   for the whole run,
// - the LilyPond `\key` token for that spelling,
// - the semitone offset applied to the C-rooted scale table, chosen by the
//   `RegisterAnchor` so charts stay in a readable register.
//
// The `Auto` accidental preference picks flats when the step moves by
// fourths (5 or 10 mod 12) and sharps for every other step.

use crate::error::{MusicError, Result};
use crate::pitch::{Accidentals, PitchClass};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Accidental style requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccidentalPreference {
    #[default]
    Auto,
    Flats,
    Sharps,
}

impl AccidentalPreference {
    /// Resolve to a concrete spelling for a cycle of the given step.
    pub fn resolve(self, step: i32) -> Accidentals {
        match self {
            AccidentalPreference::Flats => Accidentals::Flats,
            AccidentalPreference::Sharps => Accidentals::Sharps,
            AccidentalPreference::Auto => match step.rem_euclid(12) {
                5 | 10 => Accidentals::Flats,
                _ => Accidentals::Sharps,
            },
        }
    }
}

/// How a transposed chart is placed relative to the C4 reference octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterAnchor {
    /// Offset stays within -6..=5 semitones of the reference.
    #[default]
    Nearest,
    /// Always transpose upward (0..=11).
    Up,
    /// Always transpose to or below the reference (-11..=0).
    Down,
}

impl RegisterAnchor {
    pub fn offset(self, pc: PitchClass) -> i32 {
        let pc = i32::from(pc.value());
        match self {
            RegisterAnchor::Up => pc,
            RegisterAnchor::Down => {
                if pc == 0 {
                    0
                } else {
                    pc - 12
                }
            }
            RegisterAnchor::Nearest => {
                if pc <= 5 {
                    pc
                } else {
                    pc - 12
                }
            }
        }
    }
}

/// Key signature mode printed in each chart's `\key` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

impl KeyMode {
    pub fn ly_command(self) -> &'static str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        }
    }
}

/// A key from the cycle, fully resolved for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedKey {
    pub pitch_class: PitchClass,
    pub name: &'static str,
    pub ly_token: &'static str,
    /// Semitones added to every C-rooted pitch of the scale table.
    pub offset: i32,
    pub accidentals: Accidentals,
}

impl ResolvedKey {
    pub fn new(pitch_class: PitchClass, accidentals: Accidentals, anchor: RegisterAnchor) -> Self {
        ResolvedKey {
            pitch_class,
            name: pitch_class.name(accidentals),
            ly_token: pitch_class.ly_token(accidentals),
            offset: anchor.offset(pitch_class),
            accidentals,
        }
    }
}

/// Iterator over `count` keys starting at `start`, stepping by `step`
/// semitones each time.
#[derive(Debug, Clone)]
pub struct KeyCycle {
    current: PitchClass,
    step: i32,
    remaining: usize,
    accidentals: Accidentals,
    anchor: RegisterAnchor,
}

impl KeyCycle {
    pub fn new(
        start: PitchClass,
        step: i32,
        count: usize,
        accidentals: Accidentals,
        anchor: RegisterAnchor,
    ) -> Self {
        KeyCycle {
            current: start,
            step: step.rem_euclid(12),
            remaining: count,
            accidentals,
            anchor,
        }
    }
}

impl Iterator for KeyCycle {
    type Item = ResolvedKey;

    fn next(&mut self) -> Option<ResolvedKey> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let key = ResolvedKey::new(self.current, self.accidentals, self.anchor);
        self.current = self.current.shifted(self.step);
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for KeyCycle {}

/// Resolve the full list of keys for a run. An unknown starting key is an
/// error, reported before the caller has produced any output.
pub fn resolve_keys(
    start_name: &str,
    step: i32,
    count: usize,
    preference: AccidentalPreference,
    anchor: RegisterAnchor,
) -> Result<Vec<ResolvedKey>> {
    let start = PitchClass::from_key_name(start_name)
        .ok_or_else(|| MusicError::UnknownKey(start_name.to_string()))?;
    let accidentals = preference.resolve(step);
    Ok(KeyCycle::new(start, step, count, accidentals, anchor).collect())
}
