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

//! The ordered collection of currently mounted regions.

use crate::region::{Region, RegionId};

/// An arena slot. The generation is bumped every time the slot is vacated.
struct Slot<P> {
    generation: u32,
    region: Option<Region<P>>,
}

/// Mounted regions in priority order.
///
/// The most recently registered region is the topmost and wins hit tests over
/// anything it overlaps.
pub struct Registry<P> {
    slots: Vec<Slot<P>>,
    /// Indices of vacant slots, reused before the arena grows.
    free: Vec<u32>,
    /// Registered regions from back to front. The topmost region is last.
    order: Vec<RegionId>,
    /// The rank handed to the next registration.
    next_rank: u64,
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<P> Registry<P> {
    /// Creates an empty registry.
    pub fn new() -> Registry<P> {
        Registry {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            next_rank: 1,
        }
    }

    /// Registers a region on top of all existing regions and returns its handle.
    pub fn register(&mut self, mut region: Region<P>) -> RegionId {
        region.set_rank(self.next_rank);
        self.next_rank += 1;

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.region = Some(region);
                RegionId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("region arena overflow");
                self.slots.push(Slot {
                    generation: 0,
                    region: Some(region),
                });
                RegionId {
                    index,
                    generation: 0,
                }
            }
        };

        self.order.push(id);
        id
    }

    /// Removes a region and returns it. Unknown or stale handles return None.
    ///
    /// This does not release touches; see [`crate::router::TouchRouter::unregister`].
    pub fn unregister(&mut self, id: RegionId) -> Option<Region<P>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let region = slot.region.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.order.retain(|existing| *existing != id);
        Some(region)
    }

    /// Gets a mounted region.
    pub fn get(&self, id: RegionId) -> Option<&Region<P>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: RegionId) -> Option<&mut Region<P>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_mut())
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates regions from the topmost to the bottommost.
    pub fn regions_in_priority_order(&self) -> impl Iterator<Item = (RegionId, &Region<P>)> {
        self.order.iter().rev().filter_map(|id| {
            self.slots[id.index as usize]
                .region
                .as_ref()
                .map(|region| (*id, region))
        })
    }

    /// Finds the topmost region with the given name.
    pub fn find(&self, name: &str) -> Option<RegionId> {
        self.regions_in_priority_order()
            .find(|(_, region)| region.name() == name)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::Registry;
    use crate::{geometry::Rect, region::Region};

    fn region(name: &str) -> Region<()> {
        Region::new(name, Rect::new(0.0, 0.0, 1.0, 1.0), ())
    }

    fn names(registry: &Registry<()>) -> Vec<String> {
        registry
            .regions_in_priority_order()
            .map(|(_, region)| region.name().to_string())
            .collect()
    }

    #[test]
    fn newest_is_topmost() {
        let mut registry = Registry::new();
        let a = registry.register(region("a"));
        let b = registry.register(region("b"));
        let c = registry.register(region("c"));

        assert_eq!(vec!["c", "b", "a"], names(&registry));
        assert!(registry.get(c).unwrap().rank() > registry.get(b).unwrap().rank());
        assert!(registry.get(b).unwrap().rank() > registry.get(a).unwrap().rank());
        assert_eq!(3, registry.len());
    }

    #[test]
    fn unregister_removes_from_order() {
        let mut registry = Registry::new();
        let a = registry.register(region("a"));
        let b = registry.register(region("b"));

        assert_eq!("a", registry.unregister(a).unwrap().name());
        assert_eq!(vec!["b"], names(&registry));
        assert!(!registry.contains(a));
        assert!(registry.contains(b));

        // Unregistering twice is a no-op.
        assert!(registry.unregister(a).is_none());
        assert_eq!(1, registry.len());
    }

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut registry = Registry::new();
        let a = registry.register(region("a"));
        registry.unregister(a);

        // The vacated slot is reused with a new generation.
        let b = registry.register(region("b"));
        assert_eq!(a.index, b.index);
        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
        assert!(registry.unregister(a).is_none());
        assert_eq!("b", registry.get(b).unwrap().name());
    }

    #[test]
    fn reregistered_region_goes_on_top() {
        let mut registry = Registry::new();
        let a = registry.register(region("a"));
        registry.register(region("b"));

        let removed = registry.unregister(a).unwrap();
        registry.register(removed);
        assert_eq!(vec!["a", "b"], names(&registry));
    }

    #[test]
    fn find_by_name() {
        let mut registry = Registry::new();
        registry.register(region("a"));
        let b = registry.register(region("b"));
        assert_eq!(Some(b), registry.find("b"));
        assert_eq!(None, registry.find("c"));
    }
}
