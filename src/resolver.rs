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

//! Touch to region assignment.
//!
//! The [`AssignmentTable`] holds one entry per live touch. The inverse mapping,
//! each region's touch set, is kept by the router in sync with this table.

use std::{
    collections::{hash_map, HashMap},
    panic::{self, AssertUnwindSafe},
};

use tracing::warn;

use crate::{
    geometry::Point,
    region::RegionId,
    registry::Registry,
    touch::TouchId,
};

/// Finds the topmost region containing the point.
///
/// A hit test that panics counts as a non-match and the scan carries on with
/// the regions below it.
pub fn resolve<P>(registry: &Registry<P>, point: Point) -> Option<RegionId> {
    registry
        .regions_in_priority_order()
        .find(|(id, region)| {
            match panic::catch_unwind(AssertUnwindSafe(|| region.hit_test(point))) {
                Ok(hit) => hit,
                Err(_) => {
                    warn!(
                        region = %id,
                        name = region.name(),
                        point = %point,
                        "Hit test panicked, treating as a miss."
                    );
                    false
                }
            }
        })
        .map(|(id, _)| id)
}

/// The mapping from live touches to the region that owns them, if any.
#[derive(Debug, Default)]
pub struct AssignmentTable {
    entries: HashMap<TouchId, Option<RegionId>>,
}

impl AssignmentTable {
    /// Creates an empty table.
    pub fn new() -> AssignmentTable {
        AssignmentTable::default()
    }

    /// Returns the assignment for a touch. The outer option is None when the
    /// touch is not live; the inner option is None when it's live but unassigned.
    pub fn get(&self, touch: TouchId) -> Option<Option<RegionId>> {
        self.entries.get(&touch).copied()
    }

    pub fn is_live(&self, touch: TouchId) -> bool {
        self.entries.contains_key(&touch)
    }

    /// Records an assignment and returns the previous one.
    pub(crate) fn assign(&mut self, touch: TouchId, region: Option<RegionId>) -> Option<RegionId> {
        self.entries.insert(touch, region).flatten()
    }

    /// Forgets a touch and returns the region it was assigned to.
    pub(crate) fn forget(&mut self, touch: TouchId) -> Option<RegionId> {
        self.entries.remove(&touch).flatten()
    }

    /// Unassigns every touch owned by the region. The touches stay live.
    /// Returns the touches that were unassigned.
    pub(crate) fn scrub(&mut self, region: RegionId) -> Vec<TouchId> {
        let mut scrubbed = Vec::new();
        for (touch, assigned) in self.entries.iter_mut() {
            if *assigned == Some(region) {
                *assigned = None;
                scrubbed.push(*touch);
            }
        }
        scrubbed.sort();
        scrubbed
    }

    /// Touches assigned to the region, in identifier order.
    pub fn touches_for(&self, region: RegionId) -> Vec<TouchId> {
        let mut touches: Vec<TouchId> = self
            .entries
            .iter()
            .filter(|(_, assigned)| **assigned == Some(region))
            .map(|(touch, _)| *touch)
            .collect();
        touches.sort();
        touches
    }

    /// All live touches, in identifier order.
    pub fn live_touches(&self) -> Vec<TouchId> {
        let mut touches: Vec<TouchId> = self.entries.keys().copied().collect();
        touches.sort();
        touches
    }

    pub fn iter(&self) -> hash_map::Iter<'_, TouchId, Option<RegionId>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
