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

//! Touch updates as delivered by the host platform.

use std::fmt;

use serde::Deserialize;

use crate::geometry::Point;

/// A platform-provided identifier for one physical contact, unique from press to lift.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TouchId(pub u64);

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "touch {}", self.0)
    }
}

/// The phase of a touch update.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Began,
    Moved,
    Stationary,
    Ended,
    Cancelled,
}

/// A single touch update as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub id: TouchId,
    pub location: Point,
    pub phase: Phase,
}

impl TouchEvent {
    /// Creates a new touch event.
    pub fn new(id: u64, location: Point, phase: Phase) -> TouchEvent {
        TouchEvent {
            id: TouchId(id),
            location,
            phase,
        }
    }

    pub fn began(id: u64, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(id, Point::new(x, y), Phase::Began)
    }

    pub fn moved(id: u64, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(id, Point::new(x, y), Phase::Moved)
    }

    pub fn stationary(id: u64, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(id, Point::new(x, y), Phase::Stationary)
    }

    pub fn ended(id: u64, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(id, Point::new(x, y), Phase::Ended)
    }

    pub fn cancelled(id: u64, x: f64, y: f64) -> TouchEvent {
        TouchEvent::new(id, Point::new(x, y), Phase::Cancelled)
    }
}
