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

//! Scripted touch input for replaying gestures against a layout.

use std::{fs, path::Path};

use serde::Deserialize;

use super::error::ConfigError;
use crate::touch::Phase;

/// A YAML representation of a touch script.
#[derive(Deserialize, Clone, Debug)]
pub struct Script {
    steps: Vec<Step>,
}

/// A single step of a script.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Delivers a touch update.
    Touch {
        id: u64,
        phase: Phase,
        x: f64,
        y: f64,
    },
    /// Mounts a key from the layout on top of everything else.
    Mount { key: String },
    /// Unmounts a key while it may still be held.
    Unmount { key: String },
    /// Cancels every live touch.
    CancelAll,
}

impl Script {
    /// Parse a script from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Script, ConfigError> {
        Script::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parse a script from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Script, ConfigError> {
        Ok(serde_yml::from_str::<Script>(yaml)?)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::{Script, Step};
    use crate::{config::ConfigError, touch::Phase};

    #[test]
    fn parse_script() -> Result<(), Box<dyn Error>> {
        let script = Script::from_yaml(
            r#"
            steps:
              - { action: touch, id: 1, phase: began, x: 7, y: 5 }
              - { action: touch, id: 1, phase: moved, x: 2.5, y: 5 }
              - { action: unmount, key: C4 }
              - { action: mount, key: C4 }
              - action: cancel_all
            "#,
        )?;

        assert_eq!(5, script.steps().len());
        assert_eq!(
            Step::Touch {
                id: 1,
                phase: Phase::Began,
                x: 7.0,
                y: 5.0
            },
            script.steps()[0]
        );
        assert_eq!(
            Step::Touch {
                id: 1,
                phase: Phase::Moved,
                x: 2.5,
                y: 5.0
            },
            script.steps()[1]
        );
        assert_eq!(
            Step::Unmount {
                key: "C4".to_string()
            },
            script.steps()[2]
        );
        assert_eq!(Step::CancelAll, script.steps()[4]);
        Ok(())
    }

    #[test]
    fn unknown_phase() {
        let result = Script::from_yaml(
            r#"
            steps:
              - { action: touch, id: 1, phase: hovering, x: 0, y: 0 }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Script(_))));
    }
}
