//! Time-ordered scheduling of recurring and one-time events.
//!
//! A [`Timeline`] holds `(event, next fire time, interval)` bindings and a
//! clock. [`pop`](Timeline::pop) hands out events in fire-time order and
//! moves the clock to each fire time; the clock never runs backwards.
//!
//! # Ordering
//!
//! Events due at the same time fire in the order they were registered.
//! Every binding keeps its registration sequence number across
//! reinsertion, so the order is stable over the whole run.
//!
//! # Drift
//!
//! A recurring binding registered at time `t0` with interval `a` fires at
//! exactly `t0 + k·a` for `k = 1, 2, …`; fire times are recomputed from
//! the anchor rather than accumulated.

use crate::error::TimeError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Debug)]
struct Binding<E> {
    fire: f64,
    seq: u64,
    anchor: f64,
    interval: f64,
    firings: u64,
    event: E,
}

impl<E> Binding<E> {
    fn reschedule(&mut self) {
        self.firings += 1;
        self.fire = if self.interval.is_finite() {
            self.anchor + (self.firings + 1) as f64 * self.interval
        } else {
            f64::INFINITY
        };
    }
}

// `BinaryHeap` is a max-heap; reverse so the earliest (then oldest)
// binding is on top.
impl<E> Ord for Binding<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire
            .total_cmp(&self.fire)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E> PartialOrd for Binding<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for Binding<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Binding<E> {}

/// A clock plus a priority queue of scheduled events.
///
/// # Examples
///
/// ```
/// use braid_engine::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.add_recurring_event("fast", 1.0).unwrap();
/// timeline.add_recurring_event("slow", 2.0).unwrap();
///
/// let fired = timeline.pop_until(4.0).unwrap();
/// assert_eq!(fired, vec!["fast", "fast", "slow", "fast", "fast", "slow"]);
/// assert_eq!(timeline.time(), 4.0);
/// ```
#[derive(Clone, Debug)]
pub struct Timeline<E> {
    time: f64,
    next_seq: u64,
    bindings: BinaryHeap<Binding<E>>,
}

impl<E: Clone> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Timeline<E> {
    /// An empty timeline with its clock at zero.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// An empty timeline with its clock at `time`.
    pub fn starting_at(time: f64) -> Self {
        Self {
            time,
            next_seq: 0,
            bindings: BinaryHeap::new(),
        }
    }

    fn push(&mut self, event: E, fire: f64, anchor: f64, interval: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.bindings.push(Binding {
            fire,
            seq,
            anchor,
            interval,
            firings: 0,
            event,
        });
    }

    /// Schedule `event` every `interval`, first at `time() + interval`.
    pub fn add_recurring_event(&mut self, event: E, interval: f64) -> Result<(), TimeError> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(TimeError::InvalidInterval { value: interval });
        }
        let anchor = self.time;
        self.push(event, anchor + interval, anchor, interval);
        Ok(())
    }

    /// Schedule `event` once, at `time`.
    pub fn add_one_time_event(&mut self, event: E, time: f64) -> Result<(), TimeError> {
        if !(time >= self.time) {
            return Err(TimeError::Backward {
                requested: time,
                current: self.time,
            });
        }
        self.push(event, time, time, f64::INFINITY);
        Ok(())
    }

    /// Current clock value.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Fire time of the earliest binding (`+∞` if nothing can fire).
    pub fn time_of_next_event(&self) -> f64 {
        self.bindings.peek().map_or(f64::INFINITY, |b| b.fire)
    }

    /// The event that [`pop`](Self::pop) would return.
    pub fn next_event(&self) -> Option<&E> {
        self.bindings
            .peek()
            .filter(|b| b.fire.is_finite())
            .map(|b| &b.event)
    }

    /// Number of bindings, spent one-time events included.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no event was ever scheduled.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Scheduled events in registration order.
    pub fn events(&self) -> Vec<&E> {
        let mut bindings: Vec<&Binding<E>> = self.bindings.iter().collect();
        bindings.sort_by_key(|b| b.seq);
        bindings.into_iter().map(|b| &b.event).collect()
    }

    /// Fire the earliest event: move the clock to its fire time,
    /// reschedule it and return it.
    ///
    /// Returns `None` when nothing can ever fire. A one-time event is
    /// kept after firing but never fires again.
    pub fn pop(&mut self) -> Option<E> {
        if !self.time_of_next_event().is_finite() {
            return None;
        }
        let mut binding = self.bindings.pop()?;
        self.time = binding.fire;
        let event = binding.event.clone();
        binding.reschedule();
        self.bindings.push(binding);
        Some(event)
    }

    /// Iterate over the events firing up to and including `stop`.
    ///
    /// Once the iterator is exhausted the clock is set to exactly `stop`.
    pub fn iter_until(&mut self, stop: f64) -> Result<IterUntil<'_, E>, TimeError> {
        if !(stop >= self.time) {
            return Err(TimeError::Backward {
                requested: stop,
                current: self.time,
            });
        }
        Ok(IterUntil {
            timeline: self,
            stop,
        })
    }

    /// Fire every event due up to and including `stop`, collecting them.
    pub fn pop_until(&mut self, stop: f64) -> Result<Vec<E>, TimeError> {
        Ok(self.iter_until(stop)?.collect())
    }
}

/// Iterator returned by [`Timeline::iter_until`].
#[derive(Debug)]
pub struct IterUntil<'a, E> {
    timeline: &'a mut Timeline<E>,
    stop: f64,
}

impl<E: Clone> IterUntil<'_, E> {
    /// The timeline's clock: the fire time of the last yielded event.
    pub fn time(&self) -> f64 {
        self.timeline.time
    }
}

impl<E: Clone> Iterator for IterUntil<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.timeline.time_of_next_event() <= self.stop {
            if let Some(event) = self.timeline.pop() {
                return Some(event);
            }
        }
        self.timeline.time = self.stop;
        None
    }
}
