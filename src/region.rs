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

//! Interactive regions and their activation state.

use std::{collections::BTreeSet, fmt};

use crate::{
    geometry::{HitTest, Point},
    touch::TouchId,
    trigger::Feedback,
};

/// A stable handle to a mounted region.
///
/// Slots are reused after a region is unregistered, so the handle carries the
/// slot's generation. A stale handle never refers to a newer region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region {}v{}", self.index, self.generation)
    }
}

/// Whether a region is currently sounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationState {
    Inactive,
    Active,
}

/// An activation edge fired by a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Activated(RegionId),
    Deactivated(RegionId),
}

impl Edge {
    /// Computes the edge, if any, for a change in a region's touch set.
    pub fn between(region: RegionId, was_empty: bool, is_empty: bool) -> Option<Edge> {
        match (was_empty, is_empty) {
            (true, false) => Some(Edge::Activated(region)),
            (false, true) => Some(Edge::Deactivated(region)),
            _ => None,
        }
    }

    /// The region the edge belongs to.
    pub fn region(&self) -> RegionId {
        match self {
            Edge::Activated(region) | Edge::Deactivated(region) => *region,
        }
    }
}

/// A hit-testable area bound to a payload of output signals.
pub struct Region<P> {
    /// A human readable name, used in logs.
    name: String,
    /// The point predicate for this region.
    hit_test: Box<dyn HitTest>,
    /// What the trigger plays when the region activates.
    payload: P,
    /// Haptic feedback on activation.
    feedback: Feedback,
    /// Registration rank. Higher ranks sit on top. Zero until registered.
    rank: u64,
    /// The touches currently assigned to this region.
    touches: BTreeSet<TouchId>,
}

impl<P> Region<P> {
    /// Creates a new, inactive region.
    pub fn new<H>(name: &str, hit_test: H, payload: P) -> Region<P>
    where
        H: HitTest + 'static,
    {
        Region {
            name: name.to_string(),
            hit_test: Box::new(hit_test),
            payload,
            feedback: Feedback::default(),
            rank: 0,
            touches: BTreeSet::new(),
        }
    }

    /// Overrides the haptic feedback for this region.
    pub fn with_feedback(mut self, feedback: Feedback) -> Region<P> {
        self.feedback = feedback;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// The touches currently assigned to this region.
    pub fn touches(&self) -> &BTreeSet<TouchId> {
        &self.touches
    }

    pub fn state(&self) -> ActivationState {
        if self.touches.is_empty() {
            ActivationState::Inactive
        } else {
            ActivationState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == ActivationState::Active
    }

    pub(crate) fn hit_test(&self, point: Point) -> bool {
        self.hit_test.contains(point)
    }

    pub(crate) fn set_rank(&mut self, rank: u64) {
        self.rank = rank;
    }

    /// Attaches a touch and returns the resulting edge.
    pub(crate) fn attach(&mut self, id: RegionId, touch: TouchId) -> Option<Edge> {
        let was_empty = self.touches.is_empty();
        self.touches.insert(touch);
        Edge::between(id, was_empty, self.touches.is_empty())
    }

    /// Detaches a touch and returns the resulting edge.
    pub(crate) fn detach(&mut self, id: RegionId, touch: TouchId) -> Option<Edge> {
        let was_empty = self.touches.is_empty();
        self.touches.remove(&touch);
        Edge::between(id, was_empty, self.touches.is_empty())
    }

    /// Detaches every touch and returns the resulting edge.
    pub(crate) fn release(&mut self, id: RegionId) -> Option<Edge> {
        let was_empty = self.touches.is_empty();
        self.touches.clear();
        Edge::between(id, was_empty, true)
    }
}

impl<P: fmt::Debug> fmt::Debug for Region<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("rank", &self.rank)
            .field("touches", &self.touches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::{ActivationState, Edge, Region, RegionId};
    use crate::{geometry::Rect, touch::TouchId};

    const ID: RegionId = RegionId {
        index: 0,
        generation: 0,
    };

    #[test]
    fn edge_function() {
        assert_eq!(Some(Edge::Activated(ID)), Edge::between(ID, true, false));
        assert_eq!(Some(Edge::Deactivated(ID)), Edge::between(ID, false, true));
        assert_eq!(None, Edge::between(ID, true, true));
        assert_eq!(None, Edge::between(ID, false, false));
    }

    #[test]
    fn attach_and_detach() {
        let mut region = Region::new("C4", Rect::new(0.0, 0.0, 1.0, 1.0), 60u8);
        assert_eq!(ActivationState::Inactive, region.state());

        assert_eq!(Some(Edge::Activated(ID)), region.attach(ID, TouchId(1)));
        assert_eq!(None, region.attach(ID, TouchId(2)));
        // Attaching the same touch twice changes nothing.
        assert_eq!(None, region.attach(ID, TouchId(2)));
        assert_eq!(ActivationState::Active, region.state());

        assert_eq!(None, region.detach(ID, TouchId(1)));
        assert_eq!(Some(Edge::Deactivated(ID)), region.detach(ID, TouchId(2)));
        assert_eq!(None, region.detach(ID, TouchId(2)));
        assert!(!region.is_active());
    }

    #[test]
    fn release() {
        let mut region = Region::new("C4", Rect::new(0.0, 0.0, 1.0, 1.0), 60u8);
        assert_eq!(None, region.release(ID));

        region.attach(ID, TouchId(1));
        region.attach(ID, TouchId(2));
        assert_eq!(Some(Edge::Deactivated(ID)), region.release(ID));
        assert!(region.touches().is_empty());
    }
}
