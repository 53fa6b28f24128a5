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

//! A trigger that plays notes on a MIDI output port.

use std::fmt;

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use midly::{live::LiveEvent, num::u7, MidiMessage};
use parking_lot::Mutex;
use tracing::{debug, info, span, Level};

use super::{MidiSettings, Notes, Trigger, TriggerError};

/// Plays notes on a MIDI output port.
pub struct MidiTrigger {
    name: String,
    settings: MidiSettings,
    connection: Mutex<MidiOutputConnection>,
}

impl MidiTrigger {
    /// Connects to the output port whose name contains the given name.
    pub fn connect(name: &str, settings: MidiSettings) -> Result<MidiTrigger, TriggerError> {
        let span = span!(Level::INFO, "connect (midir)");
        let _enter = span.enter();

        let output = MidiOutput::new("notetouch output").map_err(midi_error)?;
        let mut matches = output
            .ports()
            .into_iter()
            .filter_map(|port| {
                let port_name = output.port_name(&port).ok()?;
                port_name.contains(name).then_some((port_name, port))
            })
            .collect::<Vec<(String, MidiOutputPort)>>();

        if matches.is_empty() {
            return Err(TriggerError::NoDevice(name.to_string()));
        }
        if matches.len() > 1 {
            return Err(TriggerError::AmbiguousDevice(
                matches
                    .iter()
                    .map(|(port_name, _)| port_name.clone())
                    .collect::<Vec<String>>()
                    .join(", "),
            ));
        }

        let (port_name, port) = matches.remove(0);
        let connection = output
            .connect(&port, "notetouch trigger")
            .map_err(midi_error)?;

        info!(
            device = port_name,
            channel = settings.channel.as_int() + 1,
            velocity = settings.velocity.as_int(),
            "Connected MIDI trigger."
        );

        Ok(MidiTrigger {
            name: port_name,
            settings,
            connection: Mutex::new(connection),
        })
    }

    fn send_all(&self, notes: &Notes, on: bool) -> Result<(), TriggerError> {
        let mut connection = self.connection.lock();
        emit_all(notes, self.settings, on, |message, buf| {
            debug!(
                device = self.name,
                event = format!("{:?}", message),
                "Emitting event."
            );
            connection.send(buf).map_err(midi_error)
        })
    }
}

/// Encodes and sends one event per note. A failed note doesn't stop the rest, so
/// a chord is never left partly sounding. Returns the first error.
fn emit_all<F>(
    notes: &Notes,
    settings: MidiSettings,
    on: bool,
    mut send: F,
) -> Result<(), TriggerError>
where
    F: FnMut(&MidiMessage, &[u8]) -> Result<(), TriggerError>,
{
    notes
        .iter()
        .map(|key| {
            let message = note_message(key, settings.velocity, on);
            let buf = encode(LiveEvent::Midi {
                channel: settings.channel,
                message,
            })?;
            send(&message, &buf)
        })
        .fold(Ok(()), |result, next| result.and(next))
}

impl Trigger<Notes> for MidiTrigger {
    fn activate(&self, notes: &Notes) -> Result<(), TriggerError> {
        self.send_all(notes, true)
    }

    fn deactivate(&self, notes: &Notes) -> Result<(), TriggerError> {
        self.send_all(notes, false)
    }
}

impl fmt::Display for MidiTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (channel {})", self.name, self.settings.channel.as_int() + 1)
    }
}

/// Lists the names of the available MIDI output ports.
pub fn list_devices() -> Result<Vec<String>, TriggerError> {
    let output = MidiOutput::new("notetouch output listing").map_err(midi_error)?;
    output
        .ports()
        .iter()
        .map(|port| output.port_name(port).map_err(midi_error))
        .collect()
}

fn note_message(key: u7, velocity: u7, on: bool) -> MidiMessage {
    if on {
        MidiMessage::NoteOn { key, vel: velocity }
    } else {
        MidiMessage::NoteOff {
            key,
            vel: u7::from(0),
        }
    }
}

fn encode(event: LiveEvent<'_>) -> Result<Vec<u8>, TriggerError> {
    let mut buf: Vec<u8> = Vec::with_capacity(3);
    event
        .write(&mut buf)
        .map_err(|e| TriggerError::Encode(e.to_string()))?;
    Ok(buf)
}

fn midi_error<E: fmt::Display>(e: E) -> TriggerError {
    TriggerError::Midi(e.to_string())
}
