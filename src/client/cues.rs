// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audible feedback cues for the composer.
//!
//! A [`Cue`] only describes what to play. Rendering it is up to a
//! [`CueSink`]; the crate ships [`TracingCueSink`], which logs instead of
//! playing so headless builds and tests stay silent.

/// Scale climbed during an upload, lowest first.
const CLIMBING_SCALE: [&str; 7] = ["C4", "E4", "G4", "C5", "E5", "G5", "C6"];

/// Notes cycled through while typing a description.
const TYPING_NOTES: [&str; 7] = ["C5", "D5", "E5", "G5", "A5", "B5", "C6"];

/// A single note within a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub name: &'static str,
    /// Delay from the start of the cue
    pub offset_ms: u64,
    pub duration_secs: f32,
}

impl Note {
    const fn new(name: &'static str, offset_ms: u64, duration_secs: f32) -> Self {
        Self {
            name,
            offset_ms,
            duration_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// Arpeggio when an upload begins.
    UploadStarted,
    /// Climbing note for an upload milestone in `[0, 1]`.
    Milestone(f64),
    Success,
    ButtonPress,
    /// The `n`th space typed into the description.
    Keystroke(usize),
}

impl Cue {
    pub fn notes(&self) -> Vec<Note> {
        match *self {
            Cue::UploadStarted => ["C5", "E5", "G5", "C6"]
                .iter()
                .zip((0u64..).step_by(80))
                .map(|(&name, offset)| Note::new(name, offset, 0.2))
                .collect(),
            Cue::Milestone(fraction) => {
                let top = CLIMBING_SCALE.len() - 1;
                let idx = ((fraction.clamp(0.0, 1.0) * top as f64).floor() as usize).min(top);
                vec![Note::new(CLIMBING_SCALE[idx], 0, 0.18)]
            }
            Cue::Success => vec![Note::new("G5", 0, 0.3), Note::new("C6", 100, 0.3)],
            Cue::ButtonPress => vec![Note::new("E5", 0, 0.15)],
            Cue::Keystroke(n) => vec![Note::new(TYPING_NOTES[n % TYPING_NOTES.len()], 0, 0.12)],
        }
    }
}

/// Something that can render cues.
pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Logs cues at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCueSink;

impl CueSink for TracingCueSink {
    fn play(&self, cue: Cue) {
        let notes: Vec<&str> = cue.notes().iter().map(|n| n.name).collect();
        tracing::debug!(?cue, ?notes, "Cue");
    }
}
