// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! The collaborators invoked on activation edges: triggers that sound notes and
//! haptics that give tactile feedback.

use std::{fmt, sync::Arc};

use midly::num::{u4, u7};
use serde::Deserialize;

pub mod midi;
pub mod mock;

/// Errors raised by trigger implementations.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("note {0} is outside of the MIDI range 0-127")]
    NoteOutOfRange(u8),
    #[error("no MIDI output device found with name {0}")]
    NoDevice(String),
    #[error("found too many devices that match ({0}), use a less ambiguous device name")]
    AmbiguousDevice(String),
    #[error("MIDI error: {0}")]
    Midi(String),
    #[error("error encoding MIDI event: {0}")]
    Encode(String),
}

/// Sounds the payload of a region. Called once per activation edge.
///
/// The router guarantees that every `activate` is followed by exactly one
/// `deactivate` for the same region, so implementations can assume well formed
/// on/off pairs.
pub trait Trigger<P>: Send + Sync {
    /// Starts sounding the payload.
    fn activate(&self, payload: &P) -> Result<(), TriggerError>;

    /// Stops sounding the payload.
    fn deactivate(&self, payload: &P) -> Result<(), TriggerError>;
}

/// Tactile feedback, fired once per activation. Best effort.
pub trait Haptics: Send + Sync {
    fn impact(&self, feedback: Feedback);
}

/// Haptics for hosts without a vibration motor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn impact(&self, _: Feedback) {}
}

/// The feel of a haptic impact.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
    Soft,
    #[default]
    Rigid,
}

impl fmt::Display for HapticStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HapticStyle::Light => "light",
            HapticStyle::Medium => "medium",
            HapticStyle::Heavy => "heavy",
            HapticStyle::Soft => "soft",
            HapticStyle::Rigid => "rigid",
        };
        write!(f, "{}", name)
    }
}

/// Default haptic intensity for a key press.
pub const DEFAULT_HAPTIC_INTENSITY: f32 = 0.67;

/// The haptic impact fired when a region activates.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Feedback {
    #[serde(default)]
    pub style: HapticStyle,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_intensity() -> f32 {
    DEFAULT_HAPTIC_INTENSITY
}

impl Default for Feedback {
    fn default() -> Self {
        Feedback {
            style: HapticStyle::default(),
            intensity: DEFAULT_HAPTIC_INTENSITY,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2}", self.style, self.intensity)
    }
}

/// The MIDI notes a key plays. More than one note makes a chord button.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Notes(Vec<u7>);

impl Notes {
    /// Creates a note set, rejecting notes outside of 0-127.
    pub fn new(notes: &[u8]) -> Result<Notes, TriggerError> {
        notes
            .iter()
            .map(|note| u7::try_from(*note).ok_or(TriggerError::NoteOutOfRange(*note)))
            .collect::<Result<Vec<u7>, TriggerError>>()
            .map(Notes)
    }

    pub fn iter(&self) -> impl Iterator<Item = u7> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Notes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: Vec<String> = self.0.iter().map(|note| note.as_int().to_string()).collect();
        write!(f, "[{}]", notes.join(", "))
    }
}

/// A trigger that forwards to several other triggers.
pub struct Multi<P> {
    triggers: Vec<Arc<dyn Trigger<P>>>,
}

impl<P> Multi<P> {
    pub fn new(triggers: Vec<Arc<dyn Trigger<P>>>) -> Multi<P> {
        Multi { triggers }
    }

    /// Calls every trigger, even after a failure, and returns the first error.
    fn fan_out<F>(&self, call: F) -> Result<(), TriggerError>
    where
        F: Fn(&dyn Trigger<P>) -> Result<(), TriggerError>,
    {
        self.triggers
            .iter()
            .map(|trigger| call(trigger.as_ref()))
            .fold(Ok(()), |result, next| result.and(next))
    }
}

impl<P> Trigger<P> for Multi<P> {
    fn activate(&self, payload: &P) -> Result<(), TriggerError> {
        self.fan_out(|trigger| trigger.activate(payload))
    }

    fn deactivate(&self, payload: &P) -> Result<(), TriggerError> {
        self.fan_out(|trigger| trigger.deactivate(payload))
    }
}

/// Settings for MIDI output triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiSettings {
    pub channel: u4,
    pub velocity: u7,
}

/// Gets the trigger for the given MIDI output device. Names starting with `mock`
/// get a recording trigger instead of a real device.
pub fn get_trigger(
    name: &str,
    settings: MidiSettings,
) -> Result<Arc<dyn Trigger<Notes>>, TriggerError> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Recorder::<Notes>::new()));
    }

    Ok(Arc::new(midi::MidiTrigger::connect(name, settings)?))
}
