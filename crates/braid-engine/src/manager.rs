//! Drives scheduled events through their lifecycle.
//!
//! An [`EventManager`] owns a [`Timeline`] of [`EventRef`]s and moves
//! from idle through running to finalized.
//!
//! - `initialize` (or the first `run`) initializes every distinct leaf
//!   event once. Chains are flattened into their leaves; an event shared
//!   between several chains is initialized once. If a leaf fails, the
//!   manager is left in [`ManagerState::Failed`] and only `finalize`
//!   is accepted.
//! - `run(stop)` fires everything due up to `stop`.
//! - `finalize` finalizes every leaf once, including after a failed
//!   initialize. Dropping a running or failed manager finalizes it too.
//!
//! Port events are initialized before mapping events, so a mapping can
//! read grids from ports that are registered after it.

use crate::error::EventError;
use crate::event::{Event, EventRef};
use crate::timeline::Timeline;

/// Lifecycle state of an [`EventManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerState {
    /// Events registered, nothing initialized.
    Idle,
    /// Leaves initialized; runs allowed.
    Running,
    /// A leaf failed to initialize; waiting for `finalize`.
    Failed,
    /// Leaves finalized; no further use.
    Finalized,
}

/// Timeline-driven executor for events.
///
/// # Examples
///
/// ```
/// use braid_core::{share, Port};
/// use braid_engine::{EventManager, EventRef, PortEvent};
/// use braid_test_utils::MockPort;
///
/// let port = share(MockPort::raster("model", &[2], &[1.0], &[0.0]));
/// let mut manager = EventManager::new();
/// manager
///     .add_recurring_event(EventRef::new(PortEvent::new(port.clone())), 1.0)
///     .unwrap();
///
/// manager.session(|m| m.run(3.0)).unwrap();
/// assert_eq!(port.borrow().current_time(), 3.0);
/// ```
#[derive(Debug)]
pub struct EventManager {
    timeline: Timeline<EventRef>,
    state: ManagerState,
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManager {
    /// An idle manager with its clock at zero.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// An idle manager with its clock at `time`.
    pub fn starting_at(time: f64) -> Self {
        Self {
            timeline: Timeline::starting_at(time),
            state: ManagerState::Idle,
        }
    }

    /// A manager running each `(event, interval)` pair every `interval`.
    pub fn from_events(
        events: impl IntoIterator<Item = (EventRef, f64)>,
    ) -> Result<Self, EventError> {
        let mut manager = Self::new();
        for (event, interval) in events {
            manager.add_recurring_event(event, interval)?;
        }
        Ok(manager)
    }

    /// Schedule `event` every `interval`.
    pub fn add_recurring_event(&mut self, event: EventRef, interval: f64) -> Result<(), EventError> {
        self.check_not_finalized()?;
        self.initialize_late(&event)?;
        self.timeline.add_recurring_event(event, interval)?;
        Ok(())
    }

    /// Schedule `event` once, at `time`.
    pub fn add_one_time_event(&mut self, event: EventRef, time: f64) -> Result<(), EventError> {
        self.check_not_finalized()?;
        self.initialize_late(&event)?;
        self.timeline.add_one_time_event(event, time)?;
        Ok(())
    }

    /// Current time.
    pub fn time(&self) -> f64 {
        self.timeline.time()
    }

    /// Lifecycle state.
    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// The underlying timeline.
    pub fn timeline(&self) -> &Timeline<EventRef> {
        &self.timeline
    }

    /// Distinct leaf events, port events first, otherwise in
    /// registration order.
    pub fn leaves(&self) -> Vec<EventRef> {
        let mut leaves = Vec::new();
        let mut seen_chains = Vec::new();
        for event in self.timeline.events() {
            collect_leaves(event, &mut leaves, &mut seen_chains);
        }
        // Stable: keeps registration order within each group.
        leaves.sort_by_key(|e| !matches!(*e.borrow(), Event::Port(_)));
        leaves
    }

    /// Initialize every leaf event. A no-op while running.
    pub fn initialize(&mut self) -> Result<(), EventError> {
        match self.state {
            ManagerState::Finalized => return Err(EventError::Finalized),
            ManagerState::Failed => return Err(EventError::InitializeFailed),
            ManagerState::Running => return Ok(()),
            ManagerState::Idle => {}
        }
        // From here on every leaf gets finalized, even if one of them
        // fails to initialize.
        self.state = ManagerState::Failed;
        let leaves = self.leaves();
        tracing::debug!(leaves = leaves.len(), time = self.time(), "initializing events");
        for leaf in &leaves {
            leaf.borrow_mut().initialize()?;
        }
        self.state = ManagerState::Running;
        Ok(())
    }

    /// Fire every event due up to and including `stop`, initializing
    /// first if needed. The clock ends at `stop`.
    pub fn run(&mut self, stop: f64) -> Result<(), EventError> {
        self.initialize()?;
        let mut due = self.timeline.iter_until(stop)?;
        while let Some(event) = due.next() {
            let time = due.time();
            tracing::trace!(event = %event.name(), time, "firing");
            event.borrow_mut().run(time)?;
        }
        Ok(())
    }

    /// Finalize every leaf event once, reporting the first failure.
    ///
    /// Finalizing an idle manager touches no event. Finalizing twice is a
    /// no-op.
    pub fn finalize(&mut self) -> Result<(), EventError> {
        let was = self.state;
        self.state = ManagerState::Finalized;
        if !matches!(was, ManagerState::Running | ManagerState::Failed) {
            return Ok(());
        }
        let mut first = None;
        for leaf in self.leaves() {
            let result = leaf.borrow_mut().finalize();
            if let Err(e) = result {
                tracing::warn!(event = %leaf.name(), error = %e, "finalize failed");
                first.get_or_insert(e);
            }
        }
        tracing::debug!(time = self.time(), "events finalized");
        first.map_or(Ok(()), Err)
    }

    /// Initialize, run `f`, then finalize whatever happened.
    ///
    /// The first error wins: an initialize error is returned after
    /// finalizing, an error from `f` takes precedence over a finalize
    /// error.
    pub fn session<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EventError>,
    ) -> Result<T, EventError> {
        let result = self.initialize().and_then(|()| f(self));
        let finalized = self.finalize();
        let value = result?;
        finalized?;
        Ok(value)
    }

    fn check_not_finalized(&self) -> Result<(), EventError> {
        match self.state {
            ManagerState::Finalized => Err(EventError::Finalized),
            ManagerState::Failed => Err(EventError::InitializeFailed),
            ManagerState::Idle | ManagerState::Running => Ok(()),
        }
    }

    /// Initialize leaves of an event added while running that are not
    /// already known.
    fn initialize_late(&self, event: &EventRef) -> Result<(), EventError> {
        if self.state != ManagerState::Running {
            return Ok(());
        }
        let known = self.leaves();
        let mut fresh = Vec::new();
        collect_leaves(event, &mut fresh, &mut Vec::new());
        for leaf in fresh {
            if !known.iter().any(|k| k.ptr_eq(&leaf)) {
                leaf.borrow_mut().initialize()?;
            }
        }
        Ok(())
    }
}

impl Drop for EventManager {
    fn drop(&mut self) {
        if matches!(self.state, ManagerState::Running | ManagerState::Failed) {
            if let Err(e) = self.finalize() {
                tracing::warn!(error = %e, "finalize on drop failed");
            }
        }
    }
}

fn collect_leaves(event: &EventRef, leaves: &mut Vec<EventRef>, seen_chains: &mut Vec<EventRef>) {
    let children = match &*event.borrow() {
        Event::Chain(chain) => Some(chain.events().to_vec()),
        _ => None,
    };
    match children {
        Some(children) => {
            if seen_chains.iter().any(|c| c.ptr_eq(event)) {
                return;
            }
            seen_chains.push(event.clone());
            for child in &children {
                collect_leaves(child, leaves, seen_chains);
            }
        }
        None => {
            if !leaves.iter().any(|l| l.ptr_eq(event)) {
                leaves.push(event.clone());
            }
        }
    }
}
