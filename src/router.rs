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

//! The touch router: the single entry point for region lifecycle and touch input.
//!
//! Every call runs to completion before returning. The assignment table and the
//! regions' touch sets are updated together first, and only then are activation
//! edges handed to the trigger and haptics, so collaborators never observe a touch
//! owned by two regions.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    geometry::Point,
    region::{ActivationState, Edge, Region, RegionId},
    registry::Registry,
    resolver::{resolve, AssignmentTable},
    touch::{Phase, TouchEvent, TouchId},
    trigger::{Haptics, Trigger},
};

mod shared;

pub use self::shared::SharedRouter;

/// Routes touches to regions and drives the trigger on activation edges.
pub struct TouchRouter<P> {
    registry: Registry<P>,
    assignments: AssignmentTable,
    trigger: Arc<dyn Trigger<P>>,
    haptics: Arc<dyn Haptics>,
}

impl<P> TouchRouter<P> {
    /// Creates a router with no regions and no touches.
    pub fn new(trigger: Arc<dyn Trigger<P>>, haptics: Arc<dyn Haptics>) -> TouchRouter<P> {
        TouchRouter {
            registry: Registry::new(),
            assignments: AssignmentTable::new(),
            trigger,
            haptics,
        }
    }

    /// Mounts a region on top of all existing regions.
    ///
    /// Touches already down are not re-resolved until they next move.
    pub fn register(&mut self, region: Region<P>) -> RegionId {
        let name = region.name().to_string();
        let id = self.registry.register(region);
        info!(region = %id, name, "Registered region.");
        id
    }

    /// Unmounts a region. If it's active, its touches are released and a
    /// deactivation fires before the region is removed. The released touches stay
    /// live and unassigned. Unknown or stale handles are a no-op.
    pub fn unregister(&mut self, id: RegionId) -> Vec<Edge> {
        let Some(region) = self.registry.get_mut(id) else {
            debug!(region = %id, "Ignoring unregister of unknown region.");
            return Vec::new();
        };

        let edges: Vec<Edge> = region.release(id).into_iter().collect();
        let released = self.assignments.scrub(id);
        if !released.is_empty() {
            info!(
                region = %id,
                touches = ?released,
                "Releasing touches held by unregistered region."
            );
        }

        self.fire(&edges);
        if let Some(region) = self.registry.unregister(id) {
            info!(region = %id, name = region.name(), "Unregistered region.");
        }
        edges
    }

    /// Unmounts every region, topmost first.
    pub fn clear(&mut self) -> Vec<Edge> {
        let ids: Vec<RegionId> = self
            .registry
            .regions_in_priority_order()
            .map(|(id, _)| id)
            .collect();
        ids.into_iter().flat_map(|id| self.unregister(id)).collect()
    }

    /// Handles a single touch update and returns the edges it fired.
    pub fn handle(&mut self, event: TouchEvent) -> Vec<Edge> {
        let TouchEvent {
            id: touch,
            location,
            phase,
        } = event;

        match (phase, self.assignments.get(touch)) {
            (Phase::Ended | Phase::Cancelled, None) => {
                debug!(touch = %touch, ?phase, "Ignoring lift of unknown touch.");
                Vec::new()
            }
            (Phase::Ended | Phase::Cancelled, Some(_)) => self.lift(touch),
            (Phase::Stationary, Some(_)) => Vec::new(),
            (Phase::Moved | Phase::Stationary, None) => {
                warn!(touch = %touch, ?phase, "Update for unknown touch, treating as began.");
                self.reassign(touch, location, None)
            }
            (Phase::Began, Some(previous)) => {
                warn!(touch = %touch, "Touch began twice, treating as moved.");
                self.reassign(touch, location, previous)
            }
            (Phase::Began, None) => self.reassign(touch, location, None),
            (Phase::Moved, Some(previous)) => self.reassign(touch, location, previous),
        }
    }

    /// Handles a batch of touch updates in order.
    pub fn handle_all<I>(&mut self, events: I) -> Vec<Edge>
    where
        I: IntoIterator<Item = TouchEvent>,
    {
        events
            .into_iter()
            .flat_map(|event| self.handle(event))
            .collect()
    }

    /// Cancels every live touch. Used when the input surface loses focus.
    pub fn cancel_all(&mut self) -> Vec<Edge> {
        let touches = self.assignments.live_touches();
        if !touches.is_empty() {
            info!(touches = touches.len(), "Cancelling all touches.");
        }
        touches
            .into_iter()
            .flat_map(|touch| self.lift(touch))
            .collect()
    }

    /// Forgets a touch and detaches it from its region.
    fn lift(&mut self, touch: TouchId) -> Vec<Edge> {
        let edges: Vec<Edge> = self
            .assignments
            .forget(touch)
            .and_then(|id| {
                self.registry
                    .get_mut(id)
                    .and_then(|region| region.detach(id, touch))
            })
            .into_iter()
            .collect();

        debug!(touch = %touch, "Touch lifted.");
        self.fire(&edges);
        edges
    }

    /// Resolves the touch at its new location and moves it between regions in one step.
    fn reassign(
        &mut self,
        touch: TouchId,
        location: Point,
        previous: Option<RegionId>,
    ) -> Vec<Edge> {
        let next = resolve(&self.registry, location);
        self.assignments.assign(touch, next);
        if next == previous {
            return Vec::new();
        }

        debug!(
            touch = %touch,
            location = %location,
            from = ?previous,
            to = ?next,
            "Touch reassigned."
        );

        // The region losing the touch goes first so a glide is heard as off, then on.
        let mut edges = Vec::with_capacity(2);
        if let Some(id) = previous {
            if let Some(edge) = self
                .registry
                .get_mut(id)
                .and_then(|region| region.detach(id, touch))
            {
                edges.push(edge);
            }
        }
        if let Some(id) = next {
            if let Some(edge) = self
                .registry
                .get_mut(id)
                .and_then(|region| region.attach(id, touch))
            {
                edges.push(edge);
            }
        }

        self.fire(&edges);
        edges
    }

    /// Hands edges to the trigger and haptics. Failures are logged, never propagated.
    fn fire(&self, edges: &[Edge]) {
        for edge in edges {
            let Some(region) = self.registry.get(edge.region()) else {
                continue;
            };
            match edge {
                Edge::Activated(id) => {
                    debug!(region = %id, name = region.name(), "Activating.");
                    if let Err(e) = self.trigger.activate(region.payload()) {
                        error!(
                            region = %id,
                            name = region.name(),
                            err = %e,
                            "Error activating region."
                        );
                    }
                    self.haptics.impact(region.feedback());
                }
                Edge::Deactivated(id) => {
                    debug!(region = %id, name = region.name(), "Deactivating.");
                    if let Err(e) = self.trigger.deactivate(region.payload()) {
                        error!(
                            region = %id,
                            name = region.name(),
                            err = %e,
                            "Error deactivating region."
                        );
                    }
                }
            }
        }
    }

    /// The mounted regions.
    pub fn registry(&self) -> &Registry<P> {
        &self.registry
    }

    /// Gets a mounted region.
    pub fn region(&self, id: RegionId) -> Option<&Region<P>> {
        self.registry.get(id)
    }

    /// Finds the topmost mounted region with the given name.
    pub fn find(&self, name: &str) -> Option<RegionId> {
        self.registry.find(name)
    }

    /// The activation state of a mounted region.
    pub fn state(&self, id: RegionId) -> Option<ActivationState> {
        self.registry.get(id).map(|region| region.state())
    }

    pub fn is_active(&self, id: RegionId) -> bool {
        self.state(id) == Some(ActivationState::Active)
    }

    /// The touches held by a region.
    pub fn touches(&self, id: RegionId) -> Vec<TouchId> {
        self.registry
            .get(id)
            .map(|region| region.touches().iter().copied().collect())
            .unwrap_or_default()
    }

    /// The region a touch is assigned to, if any.
    pub fn assignment(&self, touch: TouchId) -> Option<RegionId> {
        self.assignments.get(touch).flatten()
    }

    /// All live touches, assigned or not.
    pub fn live_touches(&self) -> Vec<TouchId> {
        self.assignments.live_touches()
    }

    /// Active regions, topmost first.
    pub fn active_regions(&self) -> Vec<RegionId> {
        self.registry
            .regions_in_priority_order()
            .filter(|(_, region)| region.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of mounted regions.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Panics if the regions' touch sets disagree with the assignment table.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (touch, assigned) in self.assignments.iter() {
            if let Some(id) = assigned {
                let region = self
                    .registry
                    .get(*id)
                    .unwrap_or_else(|| panic!("{} assigned to missing {}", touch, id));
                assert!(
                    region.touches().contains(touch),
                    "{} missing from {}",
                    touch,
                    id
                );
            }
        }
        for (id, region) in self.registry.regions_in_priority_order() {
            assert_eq!(
                self.assignments.touches_for(id),
                region.touches().iter().copied().collect::<Vec<TouchId>>(),
                "touch set of {} out of sync",
                id
            );
        }
    }
}
