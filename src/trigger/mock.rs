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

//! A recording trigger and haptic engine for tests and dry runs.

use std::{collections::HashMap, fmt, hash::Hash};

use parking_lot::Mutex;
use tracing::debug;

use super::{Feedback, Haptics, Trigger, TriggerError};

/// A call made to the recorder.
#[derive(Clone, Debug, PartialEq)]
pub enum Call<P> {
    Activate(P),
    Deactivate(P),
    Impact(Feedback),
}

impl<P: fmt::Display> fmt::Display for Call<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Activate(payload) => write!(f, "activate {}", payload),
            Call::Deactivate(payload) => write!(f, "deactivate {}", payload),
            Call::Impact(feedback) => write!(f, "haptic {}", feedback),
        }
    }
}

/// A mock trigger and haptic engine. Doesn't sound anything, just records calls.
pub struct Recorder<P> {
    calls: Mutex<Vec<Call<P>>>,
}

impl<P> Default for Recorder<P> {
    fn default() -> Self {
        Recorder {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl<P: Clone> Recorder<P> {
    /// Creates an empty recorder.
    pub fn new() -> Recorder<P> {
        Recorder::default()
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<Call<P>> {
        self.calls.lock().clone()
    }

    /// Activate and deactivate calls only.
    pub fn trigger_calls(&self) -> Vec<Call<P>> {
        self.calls
            .lock()
            .iter()
            .filter(|call| !matches!(call, Call::Impact(_)))
            .cloned()
            .collect()
    }

    /// Number of haptic impacts recorded.
    pub fn impacts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::Impact(_)))
            .count()
    }

    /// Takes the recorded calls, leaving the recorder empty.
    pub fn take(&self) -> Vec<Call<P>> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl<P: Clone + Eq + Hash> Recorder<P> {
    /// Payloads that have been activated more often than deactivated, i.e. notes
    /// that are still sounding.
    pub fn sounding(&self) -> Vec<P> {
        let mut balance: HashMap<P, i64> = HashMap::new();
        let mut order: Vec<P> = Vec::new();
        for call in self.calls.lock().iter() {
            let (payload, delta) = match call {
                Call::Activate(payload) => (payload, 1),
                Call::Deactivate(payload) => (payload, -1),
                Call::Impact(_) => continue,
            };
            if !balance.contains_key(payload) {
                order.push(payload.clone());
            }
            *balance.entry(payload.clone()).or_insert(0) += delta;
        }
        order
            .into_iter()
            .filter(|payload| balance.get(payload).is_some_and(|count| *count != 0))
            .collect()
    }
}

impl<P: Clone + fmt::Debug + Send> Trigger<P> for Recorder<P> {
    fn activate(&self, payload: &P) -> Result<(), TriggerError> {
        debug!(payload = ?payload, "Activate (mock).");
        self.calls.lock().push(Call::Activate(payload.clone()));
        Ok(())
    }

    fn deactivate(&self, payload: &P) -> Result<(), TriggerError> {
        debug!(payload = ?payload, "Deactivate (mock).");
        self.calls.lock().push(Call::Deactivate(payload.clone()));
        Ok(())
    }
}

impl<P: Send> Haptics for Recorder<P> {
    fn impact(&self, feedback: Feedback) {
        self.calls.lock().push(Call::Impact(feedback));
    }
}
