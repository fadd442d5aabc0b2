// Jazz scale charts
//
// Generates a practice chart of sixteen common jazz scales in any number of
// keys. The scale table is written once in C; each chart re-roots it on a
// key from a cycle (fourths by default), spells every note with that key's
// accidentals, and writes LilyPond source for engraving plus an optional
// companion MIDI file. The external LilyPond program turns each source into
// a PDF, and `jazz_scales_book` stitches those PDFs into a practice book.
//
// Architecture:
// - pitch.rs: Pitch classes, absolute pitches, and name/LilyPond spelling tables
// - key.rs: Key cycles, accidental preference, and register anchoring
// - scales.rs: The C-rooted scale table and chord-symbol re-rooting
// - chart.rs: One key's chart, one eight-slot bar per scale
// - lilypond.rs: Chart to `.ly` source
// - midi.rs: Chart to Standard MIDI File
// - engrave.rs: The external engraver seam and the LilyPond subprocess
// - naming.rs: Filesystem-safe per-key file names and their inverse
// - config.rs: `ChartConfig`, loadable from JSON
// - generate.rs: The multi-key pipeline with per-key outcomes
// - error.rs: `MusicError`
//
// Output is fully deterministic: the same arguments always produce
// byte-identical `.ly` and `.mid` files.

pub mod chart;
pub mod config;
pub mod engrave;
pub mod error;
pub mod generate;
pub mod key;
pub mod lilypond;
pub mod midi;
pub mod naming;
pub mod pitch;
pub mod scales;
