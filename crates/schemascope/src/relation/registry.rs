//! Readiness gate for element bounds.
//!
//! Connector geometry needs the bounds of every rendered card. Cards report
//! their bounds one at a time; the registry only declares itself ready once
//! every expected element reported and no further report arrived for
//! [`READY_DEBOUNCE`]. Lifecycle:
//!
//! ```text
//! reset(ids) → register(id, bounds, now)* → poll(now) → ready
//! ```
//!
//! Any change of the rendered node set calls [`ElementRegistry::reset`],
//! which drops all bounds and closes the gate again.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use log::{debug, trace};

use schemascope_core::{geometry::Bounds, identifier::Id};

/// Quiet period after the last registration before the gate opens.
pub const READY_DEBOUNCE: Duration = Duration::from_millis(10);

/// Owned store of measured element bounds with a one-shot readiness gate.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    expected: Vec<Id>,
    bounds: HashMap<Id, Bounds>,
    last_registration: Option<Instant>,
    debounce: Duration,
    ready: bool,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Creates an empty registry with the default debounce.
    pub fn new() -> Self {
        Self::with_debounce(READY_DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            expected: Vec::new(),
            bounds: HashMap::new(),
            last_registration: None,
            debounce,
            ready: false,
        }
    }

    /// Starts a new pass expecting exactly the elements `ids`.
    pub fn reset(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.expected = ids.into_iter().collect();
        self.bounds.clear();
        self.last_registration = None;
        self.ready = false;
        debug!(expected = self.expected.len(); "Element registry reset");
    }

    /// Records the bounds of element `id` measured at `now`.
    ///
    /// Returns false, and records nothing, if `id` is not expected in the
    /// current pass. Registering an element again replaces its bounds and
    /// restarts the debounce.
    pub fn register(&mut self, id: Id, bounds: Bounds, now: Instant) -> bool {
        if !self.expected.contains(&id) {
            trace!(id:% = id; "Ignoring bounds of unexpected element");
            return false;
        }
        self.bounds.insert(id, bounds);
        self.last_registration = Some(now);
        true
    }

    /// Number of expected elements that have not reported yet.
    pub fn pending(&self) -> usize {
        self.expected
            .iter()
            .filter(|id| !self.bounds.contains_key(id))
            .count()
    }

    /// Earliest instant at which [`poll`](Self::poll) can open the gate, if
    /// every element has reported.
    pub fn ready_at(&self) -> Option<Instant> {
        if self.pending() > 0 {
            return None;
        }
        self.last_registration.map(|last| last + self.debounce)
    }

    /// Opens the gate if all elements reported and the debounce elapsed.
    ///
    /// Once open, the gate stays open until the next [`reset`](Self::reset).
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.ready && self.ready_at().is_some_and(|at| now >= at) {
            self.ready = true;
            debug!(elements = self.expected.len(); "Element bounds complete");
        }
        self.ready
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Bounds reported for `id` in the current pass.
    pub fn bounds(&self, id: Id) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }

    /// The elements of the current pass, in the order they were expected.
    pub fn expected(&self) -> &[Id] {
        &self.expected
    }
}
