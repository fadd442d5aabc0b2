// MIDI output from charts.
//
// Writes a chart as a Standard MIDI File so the scales can be auditioned
// alongside the engraved PDF. Every note slot is one eighth note and rest
// slots simply advance time, so the audio lines up bar for bar with the
// printed chart.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 0 (a single
// track carrying tempo, time signature, track name, and notes).

use crate::chart::{Chart, Slot};
use crate::error::{MusicError, Result};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Ticks per eighth note (half a quarter note).
const TICKS_PER_EIGHTH: u32 = TICKS_PER_QUARTER as u32 / 2;

/// Largest value the 24-bit tempo meta event can hold.
const MAX_TEMPO_MICROSECONDS: u32 = 0xFF_FFFF;

/// Slowest tempo whose quarter note fits in the tempo meta event.
pub const MIN_TEMPO_BPM: u16 = 4;

const CHANNEL: u8 = 0;
const VELOCITY: u8 = 80;

/// Convert a chart to MIDI and write it to a file.
pub fn write_midi(chart: &Chart, tempo_bpm: u16, path: &Path) -> Result<()> {
    let smf = chart_to_smf(chart, tempo_bpm)?;
    smf.save(path).map_err(|e| MusicError::io(path, e))
}

/// Microseconds per quarter note for a tempo, or `TempoOutOfRange` when
/// the tempo is zero or too slow for the tempo meta event.
pub fn tempo_microseconds(tempo_bpm: u16) -> Result<u32> {
    match 60_000_000u32.checked_div(u32::from(tempo_bpm)) {
        Some(micros) if micros <= MAX_TEMPO_MICROSECONDS => Ok(micros),
        _ => Err(MusicError::TempoOutOfRange(tempo_bpm)),
    }
}

fn meta(kind: MetaMessage<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(kind),
    }
}

fn note_event(delta: u32, key: u8, on: bool) -> TrackEvent<'static> {
    let message = if on {
        MidiMessage::NoteOn {
            key: u7::new(key),
            vel: u7::new(VELOCITY),
        }
    } else {
        MidiMessage::NoteOff {
            key: u7::new(key),
            vel: u7::new(0),
        }
    };
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(CHANNEL),
            message,
        },
    }
}

/// Convert a chart to an in-memory SMF borrowing the chart's title.
fn chart_to_smf(chart: &Chart, tempo_bpm: u16) -> Result<Smf<'_>> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'_> = Vec::new();
    let tempo_microseconds = tempo_microseconds(tempo_bpm)?;
    track.push(meta(MetaMessage::TrackName(chart.title.as_bytes())));
    track.push(meta(MetaMessage::Tempo(u24::new(tempo_microseconds))));
    // 4/4, denominator as a power of two, 24 clocks per click, 8 32nds per quarter.
    track.push(meta(MetaMessage::TimeSignature(4, 2, 24, 8)));

    // Ticks of silence accumulated since the last emitted event.
    let mut pending_rest: u32 = 0;
    for bar in &chart.bars {
        for slot in &bar.slots {
            match slot {
                Slot::Note { pitch, .. } => {
                    let key = pitch
                        .to_midi()
                        .ok_or(MusicError::PitchOutOfRange(pitch.0))?;
                    track.push(note_event(pending_rest, key, true));
                    track.push(note_event(TICKS_PER_EIGHTH, key, false));
                    pending_rest = 0;
                }
                Slot::Rest => pending_rest += TICKS_PER_EIGHTH,
            }
        }
    }

    track.push(TrackEvent {
        delta: u28::new(pending_rest),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    Ok(smf)
}
