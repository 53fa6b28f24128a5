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
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::TouchRouter;
use crate::{
    region::{ActivationState, Edge, Region, RegionId},
    touch::TouchEvent,
};

/// A router that can be shared between threads.
///
/// Hosts that deliver touches or mount regions from more than one thread go
/// through this handle. Every operation takes the same lock, so each update
/// still runs to completion before the next one starts.
pub struct SharedRouter<P> {
    inner: Arc<Mutex<TouchRouter<P>>>,
}

impl<P> Clone for SharedRouter<P> {
    fn clone(&self) -> Self {
        SharedRouter {
            inner: self.inner.clone(),
        }
    }
}

impl<P> SharedRouter<P> {
    pub fn new(router: TouchRouter<P>) -> SharedRouter<P> {
        SharedRouter {
            inner: Arc::new(Mutex::new(router)),
        }
    }

    pub fn register(&self, region: Region<P>) -> RegionId {
        self.inner.lock().register(region)
    }

    pub fn unregister(&self, id: RegionId) -> Vec<Edge> {
        self.inner.lock().unregister(id)
    }

    pub fn handle(&self, event: TouchEvent) -> Vec<Edge> {
        self.inner.lock().handle(event)
    }

    pub fn cancel_all(&self) -> Vec<Edge> {
        self.inner.lock().cancel_all()
    }

    pub fn clear(&self) -> Vec<Edge> {
        self.inner.lock().clear()
    }

    pub fn state(&self, id: RegionId) -> Option<ActivationState> {
        self.inner.lock().state(id)
    }

    pub fn is_active(&self, id: RegionId) -> bool {
        self.inner.lock().is_active(id)
    }

    /// Locks the router for a sequence of operations that must not interleave
    /// with other threads.
    pub fn lock(&self) -> MutexGuard<'_, TouchRouter<P>> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, thread};

    use super::SharedRouter;
    use crate::{
        geometry::Rect,
        region::Region,
        router::TouchRouter,
        touch::TouchEvent,
        trigger::mock::Recorder,
    };

    #[test]
    fn concurrent_input_threads() {
        let recorder = Arc::new(Recorder::<u8>::new());
        let router = SharedRouter::new(TouchRouter::<u8>::new(recorder.clone(), recorder.clone()));
        let keys: Vec<_> = (0..4u8)
            .map(|i| {
                router.register(Region::new(
                    &format!("key {}", i),
                    Rect::new(f64::from(i) * 10.0, 0.0, 10.0, 10.0),
                    i,
                ))
            })
            .collect();

        let handles: Vec<_> = (0..4u64)
            .map(|thread_index| {
                let router = router.clone();
                thread::spawn(move || {
                    for round in 0..100u64 {
                        let touch = thread_index * 1000 + round;
                        let x = (round % 40) as f64 + 0.5;
                        router.handle(TouchEvent::began(touch, x, 5.0));
                        router.handle(TouchEvent::moved(touch, 39.5 - x, 5.0));
                        router.handle(TouchEvent::ended(touch, 39.5 - x, 5.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for key in keys {
            assert!(!router.is_active(key));
        }
        assert!(recorder.sounding().is_empty());
        router.lock().assert_consistent();
    }
}
