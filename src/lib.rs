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

//! Routes multi-touch input to overlapping on-screen keys.
//!
//! Regions are mounted into a [`router::TouchRouter`], which resolves each touch
//! to the topmost region under it, tracks which touches hold which region, and
//! fires note on and note off through a [`trigger::Trigger`] exactly when a
//! region goes from untouched to touched and back.

pub mod config;
pub mod geometry;
pub mod region;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod touch;
pub mod trigger;

pub use crate::geometry::{HitTest, Point, Rect, Shape};
pub use crate::region::{ActivationState, Edge, Region, RegionId};
pub use crate::router::{SharedRouter, TouchRouter};
pub use crate::touch::{Phase, TouchEvent, TouchId};
pub use crate::trigger::{Feedback, Haptics, Trigger, TriggerError};
