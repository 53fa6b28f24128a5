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

//! Key layouts: the keys of an on-screen instrument and how they sound.

use std::{collections::HashSet, path::Path};

use config::{Config, File, FileFormat};
use midly::num::{u4, u7};
use serde::Deserialize;

use super::error::ConfigError;
use crate::{
    geometry::Shape,
    region::Region,
    trigger::{Feedback, HapticStyle, MidiSettings, Notes},
};

/// Default MIDI channel (1-indexed).
pub const DEFAULT_CHANNEL: u8 = 1;

/// Default note velocity. Keys always strike at full velocity.
pub const DEFAULT_VELOCITY: u8 = 127;

/// A YAML representation of a keyboard layout.
#[derive(Deserialize, Clone, Debug)]
pub struct Layout {
    /// MIDI output settings.
    #[serde(default)]
    trigger: TriggerConfig,

    /// Default haptic feedback for every key.
    #[serde(default)]
    haptics: Feedback,

    /// The keys, from the bottom of the stack to the top.
    keys: Vec<KeyDefinition>,
}

/// MIDI output settings.
#[derive(Deserialize, Clone, Copy, Debug)]
pub struct TriggerConfig {
    /// The MIDI channel (1-16).
    #[serde(default = "default_channel")]
    channel: u8,

    /// The velocity of every note on.
    #[serde(default = "default_velocity")]
    velocity: u8,
}

fn default_channel() -> u8 {
    DEFAULT_CHANNEL
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            channel: DEFAULT_CHANNEL,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// A single key.
#[derive(Deserialize, Clone, Debug)]
pub struct KeyDefinition {
    /// The name of the key, unique within the layout.
    name: String,

    /// The MIDI notes the key plays.
    notes: Vec<u8>,

    /// The area of the key.
    shape: Shape,

    /// Overrides the layout's haptic feedback.
    #[serde(default)]
    haptics: FeedbackOverride,
}

/// Per-key haptic settings. Anything left out comes from the layout.
#[derive(Deserialize, Clone, Copy, Debug, Default)]
struct FeedbackOverride {
    style: Option<HapticStyle>,
    intensity: Option<f32>,
}

impl FeedbackOverride {
    fn apply(&self, base: Feedback) -> Feedback {
        Feedback {
            style: self.style.unwrap_or(base.style),
            intensity: self.intensity.unwrap_or(base.intensity),
        }
    }
}

impl KeyDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("key names must not be empty".into()));
        }
        if self.notes.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "key {} must play at least one note",
                self.name
            )));
        }
        if let Some(note) = self.notes.iter().find(|note| **note > 127) {
            return Err(ConfigError::Invalid(format!(
                "key {} has note {} outside of 0-127",
                self.name, note
            )));
        }
        if let Some(intensity) = self.haptics.intensity {
            validate_intensity(intensity)
                .map_err(|e| ConfigError::Invalid(format!("key {}: {}", self.name, e)))?;
        }
        self.shape
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("key {}: {}", self.name, e)))
    }
}

fn validate_intensity(intensity: f32) -> Result<(), String> {
    if (0.0..=1.0).contains(&intensity) {
        Ok(())
    } else {
        Err(format!(
            "haptic intensity must be within 0.0-1.0, got {}",
            intensity
        ))
    }
}

impl Layout {
    /// Parse and validate a layout from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Layout, ConfigError> {
        let layout = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Layout>()?;
        layout.validate()?;
        Ok(layout)
    }

    /// Parse and validate a layout from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Layout, ConfigError> {
        let layout = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<Layout>()?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::Invalid(
                "layout must define at least one key".into(),
            ));
        }
        if !(1..=16).contains(&self.trigger.channel) {
            return Err(ConfigError::Invalid(format!(
                "MIDI channel must be within 1-16, got {}",
                self.trigger.channel
            )));
        }
        if self.trigger.velocity > 127 {
            return Err(ConfigError::Invalid(format!(
                "velocity must be within 0-127, got {}",
                self.trigger.velocity
            )));
        }
        validate_intensity(self.haptics.intensity).map_err(ConfigError::Invalid)?;

        let mut names: HashSet<&str> = HashSet::new();
        for key in self.keys.iter() {
            key.validate()?;
            if !names.insert(key.name()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate key name {}",
                    key.name()
                )));
            }
        }
        Ok(())
    }

    /// The keys, from the bottom of the stack to the top.
    pub fn keys(&self) -> &[KeyDefinition] {
        &self.keys
    }

    /// Finds a key by name.
    pub fn key(&self, name: &str) -> Option<&KeyDefinition> {
        self.keys.iter().find(|key| key.name == name)
    }

    /// The MIDI output settings. The channel is zero-indexed as on the wire.
    pub fn midi_settings(&self) -> MidiSettings {
        MidiSettings {
            channel: u4::from(self.trigger.channel.saturating_sub(1)),
            velocity: u7::from(self.trigger.velocity),
        }
    }

    /// The haptic feedback for the key. Fields the key doesn't set come from the
    /// layout.
    pub fn feedback(&self, key: &KeyDefinition) -> Feedback {
        key.haptics.apply(self.haptics)
    }

    /// Builds the region for a key.
    pub fn region(&self, key: &KeyDefinition) -> Result<Region<Notes>, ConfigError> {
        let notes = Notes::new(&key.notes).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Region::new(&key.name, key.shape.clone(), notes).with_feedback(self.feedback(key)))
    }

    /// Builds the regions for every key, in registration order.
    pub fn regions(&self) -> Result<Vec<Region<Notes>>, ConfigError> {
        self.keys.iter().map(|key| self.region(key)).collect()
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, io::Write};

    use super::Layout;
    use crate::{
        config::ConfigError,
        geometry::{HitTest, Point},
        trigger::HapticStyle,
    };

    const LAYOUT: &str = r#"
        trigger:
          channel: 3
        haptics:
          style: medium
        keys:
          - name: C4
            notes: [60]
            shape: { type: rect, x: 0, y: 0, width: 40, height: 200 }
          - name: C#4
            notes: [61]
            shape: { type: rounded_rect, x: 28, y: 0, width: 24, height: 120, radius: 4 }
            haptics: { style: light, intensity: 0.5 }
          - name: Cmaj
            notes: [60, 64, 67]
            shape:
              type: polygon
              points:
                - { x: 100, y: 0 }
                - { x: 140, y: 0 }
                - { x: 120, y: 40 }
    "#;

    #[test]
    fn parse_layout() -> Result<(), Box<dyn Error>> {
        let layout = Layout::from_yaml(LAYOUT)?;

        assert_eq!(3, layout.keys().len());
        assert_eq!(2, layout.midi_settings().channel.as_int());
        assert_eq!(127, layout.midi_settings().velocity.as_int());

        let c4 = layout.key("C4").unwrap();
        assert_eq!(HapticStyle::Medium, layout.feedback(c4).style);
        assert!((layout.feedback(c4).intensity - 0.67).abs() < f32::EPSILON);

        let sharp = layout.key("C#4").unwrap();
        assert_eq!(HapticStyle::Light, layout.feedback(sharp).style);
        assert!(sharp.shape().contains(Point::new(40.0, 60.0)));

        let regions = layout.regions()?;
        assert_eq!("Cmaj", regions[2].name());
        assert_eq!(3, regions[2].payload().len());
        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<(), Box<dyn Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(LAYOUT.as_bytes())?;
        file.flush()?;

        let layout = Layout::deserialize(file.path())?;
        let names: Vec<&str> = layout.keys().iter().map(|key| key.name()).collect();
        assert_eq!(vec!["C4", "C#4", "Cmaj"], names);
        Ok(())
    }

    #[test]
    fn key_haptics_fill_in_from_the_layout() -> Result<(), Box<dyn Error>> {
        let layout = Layout::from_yaml(
            r#"
            haptics: { style: heavy, intensity: 0.3 }
            keys:
              - name: a
                notes: [60]
                shape: { type: rect, x: 0, y: 0, width: 1, height: 1 }
                haptics: { style: light }
              - name: b
                notes: [61]
                shape: { type: rect, x: 1, y: 0, width: 1, height: 1 }
                haptics: { intensity: 0.9 }
              - name: c
                notes: [62]
                shape: { type: rect, x: 2, y: 0, width: 1, height: 1 }
            "#,
        )?;

        let a = layout.feedback(layout.key("a").unwrap());
        assert_eq!(HapticStyle::Light, a.style);
        assert!((a.intensity - 0.3).abs() < f32::EPSILON);

        let b = layout.feedback(layout.key("b").unwrap());
        assert_eq!(HapticStyle::Heavy, b.style);
        assert!((b.intensity - 0.9).abs() < f32::EPSILON);

        let c = layout.feedback(layout.key("c").unwrap());
        assert_eq!(HapticStyle::Heavy, c.style);
        assert!((c.intensity - 0.3).abs() < f32::EPSILON);
        Ok(())
    }

    fn invalid(yaml: &str) -> bool {
        matches!(Layout::from_yaml(yaml), Err(ConfigError::Invalid(_)))
    }

    #[test]
    fn rejects_invalid_layouts() {
        assert!(invalid("keys: []"));
        assert!(invalid(
            r#"
            keys:
              - { name: a, notes: [128], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            keys:
              - { name: a, notes: [], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            keys:
              - { name: a, notes: [60], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
              - { name: a, notes: [61], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            keys:
              - { name: a, notes: [60], shape: { type: rect, x: 0, y: 0, width: 0, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            trigger: { channel: 17 }
            keys:
              - { name: a, notes: [60], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            haptics: { intensity: 1.5 }
            keys:
              - { name: a, notes: [60], shape: { type: rect, x: 0, y: 0, width: 1, height: 1 } }
            "#
        ));
        assert!(invalid(
            r#"
            keys:
              - name: a
                notes: [60]
                shape: { type: rect, x: 0, y: 0, width: 1, height: 1 }
                haptics: { intensity: -0.5 }
            "#
        ));
    }

    #[test]
    fn unknown_shape_is_a_load_error() {
        let result = Layout::from_yaml(
            r#"
            keys:
              - { name: a, notes: [60], shape: { type: star } }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
