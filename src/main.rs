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
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use notetouch::config::{Layout, Script, Step};
use notetouch::geometry::Point;
use notetouch::router::TouchRouter;
use notetouch::touch::TouchEvent;
use notetouch::trigger::{self, midi, mock::Recorder, Multi, Notes, Trigger};
use tracing::{info, span, warn, Level};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A multi-touch note router."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replays a touch script against a key layout and prints every note and haptic.
    Replay {
        /// The path to the key layout.
        layout_path: String,
        /// The path to the touch script.
        script_path: String,
        /// The MIDI device to also send notes to.
        #[arg[short, long]]
        midi_device: Option<String>,
    },
    /// Verifies a key layout and prints its keys from the top of the stack down.
    Layout {
        /// The path to the key layout.
        layout_path: String,
    },
    /// Lists the available MIDI output devices.
    MidiDevices {},
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            layout_path,
            script_path,
            midi_device,
        } => {
            let layout = Layout::deserialize(&PathBuf::from(layout_path))?;
            let script = Script::deserialize(&PathBuf::from(script_path))?;
            replay(&layout, &script, midi_device)?;
        }
        Commands::Layout { layout_path } => {
            let layout = Layout::deserialize(&PathBuf::from(&layout_path))?;
            let settings = layout.midi_settings();

            println!(
                "Layout {} (channel: {}, velocity: {}):",
                layout_path,
                settings.channel.as_int() + 1,
                settings.velocity.as_int()
            );
            for key in layout.keys().iter().rev() {
                let bounds = key.shape().bounds();
                println!(
                    "- {}: notes {:?}, bounds ({}, {}) to ({}, {}), haptics {}",
                    key.name(),
                    key.notes(),
                    bounds.x,
                    bounds.y,
                    bounds.max_x(),
                    bounds.max_y(),
                    layout.feedback(key)
                );
            }
        }
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
    }

    Ok(())
}

/// Runs the script through a router built from the layout. Anything still held at
/// the end of the script is cancelled so no note is left sounding.
fn replay(
    layout: &Layout,
    script: &Script,
    midi_device: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let recorder = Arc::new(Recorder::<Notes>::new());
    let trigger: Arc<dyn Trigger<Notes>> = match midi_device {
        Some(name) => {
            let triggers: Vec<Arc<dyn Trigger<Notes>>> = vec![
                recorder.clone(),
                trigger::get_trigger(&name, layout.midi_settings())?,
            ];
            Arc::new(Multi::new(triggers))
        }
        None => recorder.clone(),
    };

    let mut router = TouchRouter::new(trigger, recorder.clone());
    for region in layout.regions()? {
        router.register(region);
    }

    let span = span!(Level::INFO, "replay");
    let _enter = span.enter();
    info!(keys = router.len(), steps = script.steps().len(), "Replaying script.");

    for (index, step) in script.steps().iter().enumerate() {
        match step {
            Step::Touch { id, phase, x, y } => {
                router.handle(TouchEvent::new(*id, Point::new(*x, *y), *phase));
            }
            Step::Mount { key } => {
                let Some(definition) = layout.key(key) else {
                    return Err(format!("step {} mounts unknown key {}", index + 1, key).into());
                };
                router.register(layout.region(definition)?);
            }
            Step::Unmount { key } => match router.find(key) {
                Some(id) => {
                    router.unregister(id);
                }
                None => warn!(step = index + 1, key = %key, "Key is not mounted."),
            },
            Step::CancelAll => {
                router.cancel_all();
            }
        }

        for call in recorder.take() {
            println!("{:>4}: {}", index + 1, call);
        }
    }

    let held: Vec<String> = router
        .active_regions()
        .into_iter()
        .filter_map(|id| router.region(id).map(|region| region.name().to_string()))
        .collect();
    if !held.is_empty() {
        println!("Still held at end of script: {}", held.join(", "));
        router.cancel_all();
        for call in recorder.take() {
            println!(" end: {}", call);
        }
    }

    Ok(())
}
