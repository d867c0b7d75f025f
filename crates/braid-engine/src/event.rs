//! Schedulable units of work.
//!
//! An [`Event`] is one of three things: stepping a port
//! ([`PortEvent`]), copying variables between two ports through a
//! mapper ([`PortMapEvent`]), or a sequence of other events run back to
//! back ([`ChainEvent`]). Every event has the same three-phase lifecycle:
//! `initialize`, any number of `run(time)`, then `finalize`.
//!
//! Events are shared through [`EventRef`]: the same event may appear in
//! several chains and on the timeline, and is identified by pointer.

use crate::config::ExchangeItem;
use crate::error::EventError;
use crate::port_grid::grid_from_port;
use braid_core::{PortError, SharedPort};
use braid_map::{find_mappers, Mapper, MapperKind, Reduction};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Sentinel used by [`PortMapEvent`] unless configured otherwise.
pub const DEFAULT_BAD_VAL: f64 = -999.0;

/// Slack when counting whole steps, so `0.3 - 0.2` still covers one
/// step of `0.1`.
const STEP_TOLERANCE: f64 = 1e-9;

// ── EventRef ───────────────────────────────────────────────────────

/// Shared handle to an [`Event`], compared by identity.
#[derive(Clone)]
pub struct EventRef(Rc<RefCell<Event>>);

impl EventRef {
    /// Wrap an event into a new shared handle.
    pub fn new(event: impl Into<Event>) -> Self {
        Self(Rc::new(RefCell::new(event.into())))
    }

    /// Whether both handles point at the same event.
    pub fn ptr_eq(&self, other: &EventRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the event.
    ///
    /// # Panics
    ///
    /// Panics if the event is currently running.
    pub fn borrow(&self) -> Ref<'_, Event> {
        self.0.borrow()
    }

    /// Borrow the event mutably.
    ///
    /// # Panics
    ///
    /// Panics if the event is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Event> {
        self.0.borrow_mut()
    }

    /// The event's name.
    pub fn name(&self) -> String {
        self.borrow().name().to_string()
    }
}

impl fmt::Debug for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(event) => f.debug_tuple("EventRef").field(&*event).finish(),
            Err(_) => f.write_str("EventRef(<borrowed>)"),
        }
    }
}

// ── Event ──────────────────────────────────────────────────────────

/// The closed set of schedulable events.
#[derive(Debug)]
pub enum Event {
    /// Step a port.
    Port(PortEvent),
    /// Run several events in order.
    Chain(ChainEvent),
    /// Map variables from one port into another.
    PortMap(PortMapEvent),
}

impl Event {
    /// Name for logs and errors.
    pub fn name(&self) -> &str {
        match self {
            Self::Port(e) => &e.name,
            Self::Chain(e) => &e.name,
            Self::PortMap(e) => &e.name,
        }
    }

    /// Prepare the event.
    pub fn initialize(&mut self) -> Result<(), EventError> {
        match self {
            Self::Port(e) => e.initialize(),
            Self::Chain(e) => e.initialize(),
            Self::PortMap(e) => e.initialize(),
        }
    }

    /// Execute the event at `time`.
    pub fn run(&mut self, time: f64) -> Result<(), EventError> {
        match self {
            Self::Port(e) => e.run(time),
            Self::Chain(e) => e.run(time),
            Self::PortMap(e) => e.run(time),
        }
    }

    /// Release the event.
    pub fn finalize(&mut self) -> Result<(), EventError> {
        match self {
            Self::Port(e) => e.finalize(),
            Self::Chain(e) => e.finalize(),
            Self::PortMap(e) => e.finalize(),
        }
    }
}

impl From<PortEvent> for Event {
    fn from(e: PortEvent) -> Self {
        Self::Port(e)
    }
}

impl From<ChainEvent> for Event {
    fn from(e: ChainEvent) -> Self {
        Self::Chain(e)
    }
}

impl From<PortMapEvent> for Event {
    fn from(e: PortMapEvent) -> Self {
        Self::PortMap(e)
    }
}

// ── PortEvent ──────────────────────────────────────────────────────

/// Steps a port forward in whole time steps.
pub struct PortEvent {
    name: String,
    port: SharedPort,
}

impl PortEvent {
    /// Drive `port`.
    pub fn new(port: SharedPort) -> Self {
        let name = port.borrow().name().to_string();
        Self { name, port }
    }

    /// The driven port.
    pub fn port(&self) -> &SharedPort {
        &self.port
    }

    fn port_error(&self, error: PortError) -> EventError {
        EventError::Port {
            port: self.name.clone(),
            error,
        }
    }

    fn initialize(&mut self) -> Result<(), EventError> {
        self.port
            .borrow_mut()
            .initialize()
            .map_err(|e| self.port_error(e))?;
        tracing::debug!(port = %self.name, "port initialized");
        Ok(())
    }

    /// Advance the port to the last whole step at or before `time`,
    /// never past its end time.
    fn run(&mut self, time: f64) -> Result<(), EventError> {
        let mut port = self.port.borrow_mut();
        let current = port.current_time();
        let dt = port.time_step();
        if !(dt.is_finite() && dt > 0.0) {
            return Err(EventError::InvalidTimeStep {
                port: self.name.clone(),
                value: dt,
            });
        }

        let steps = ((time - current) / dt + STEP_TOLERANCE).floor();
        let target = (current + steps.max(0.0) * dt).min(port.end_time());
        if target <= current {
            tracing::trace!(port = %self.name, time, current, "no whole step due");
            return Ok(());
        }
        tracing::trace!(port = %self.name, time, target, "update_until");
        port.update_until(target).map_err(|e| self.port_error(e))
    }

    fn finalize(&mut self) -> Result<(), EventError> {
        self.port
            .borrow_mut()
            .finalize()
            .map_err(|e| self.port_error(e))?;
        tracing::debug!(port = %self.name, "port finalized");
        Ok(())
    }
}

impl fmt::Debug for PortEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortEvent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ── ChainEvent ─────────────────────────────────────────────────────

/// Runs its events in order, as one scheduled unit.
#[derive(Debug)]
pub struct ChainEvent {
    name: String,
    events: Vec<EventRef>,
}

impl ChainEvent {
    /// Chain `events`, run first to last.
    pub fn new(events: Vec<EventRef>) -> Self {
        let names: Vec<String> = events.iter().map(EventRef::name).collect();
        Self {
            name: format!("chain[{}]", names.join(", ")),
            events,
        }
    }

    /// The chained events, in run order.
    pub fn events(&self) -> &[EventRef] {
        &self.events
    }

    fn initialize(&mut self) -> Result<(), EventError> {
        for event in &self.events {
            event.borrow_mut().initialize()?;
        }
        Ok(())
    }

    fn run(&mut self, time: f64) -> Result<(), EventError> {
        for event in &self.events {
            event.borrow_mut().run(time)?;
        }
        Ok(())
    }

    /// Finalizes every event even if one fails, reporting the first
    /// failure.
    fn finalize(&mut self) -> Result<(), EventError> {
        let mut first = None;
        for event in &self.events {
            if let Err(e) = event.borrow_mut().finalize() {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

// ── PortMapEvent ───────────────────────────────────────────────────

/// Copies variables from a source port into a destination port.
///
/// `initialize` reads both grids from the ports and binds a mapper: the
/// one requested with [`with_mapper`](Self::with_mapper), or else the
/// first kind that accepts the grid pair. All exchange items must live
/// on the grids of the first item. A [`PointToCell`](braid_map::PointToCell)
/// mapper aggregates with the [`Reduction`] set by
/// [`with_reduction`](Self::with_reduction).
///
/// Each run reads the destination's current values, overlays the good
/// source values (those strictly above the sentinel) and writes the
/// result back.
pub struct PortMapEvent {
    name: String,
    dst_name: String,
    src_name: String,
    dst: SharedPort,
    src: SharedPort,
    items: Vec<ExchangeItem>,
    requested: Option<MapperKind>,
    mapper: Option<Box<dyn Mapper>>,
    reduction: Reduction,
    bad_val: f64,
}

impl PortMapEvent {
    /// Map `items` from `src` into `dst`.
    pub fn new(dst: SharedPort, src: SharedPort, items: Vec<ExchangeItem>) -> Self {
        let dst_name = dst.borrow().name().to_string();
        let src_name = src.borrow().name().to_string();
        Self {
            name: format!("map {src_name} -> {dst_name}"),
            dst_name,
            src_name,
            dst,
            src,
            items,
            requested: None,
            mapper: None,
            reduction: Reduction::default(),
            bad_val: DEFAULT_BAD_VAL,
        }
    }

    /// Use a specific mapper instead of the first compatible one.
    pub fn with_mapper(mut self, kind: MapperKind) -> Self {
        self.requested = Some(kind);
        self
    }

    /// Aggregate with `reduction` when several source points land in one
    /// destination cell.
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Treat source values at or below `bad_val` as missing.
    pub fn with_bad_val(mut self, bad_val: f64) -> Self {
        self.bad_val = bad_val;
        self
    }

    /// The exchanged variable pairs.
    pub fn items(&self) -> &[ExchangeItem] {
        &self.items
    }

    /// The sentinel value.
    pub fn bad_val(&self) -> f64 {
        self.bad_val
    }

    /// The cell aggregation.
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// The bound mapper, once initialized.
    pub fn mapper(&self) -> Option<&dyn Mapper> {
        self.mapper.as_deref()
    }

    fn initialize(&mut self) -> Result<(), EventError> {
        let Some(first) = self.items.first() else {
            tracing::debug!(event = %self.name, "no exchange items");
            return Ok(());
        };
        let dst = self.dst.borrow();
        let src = self.src.borrow();
        let dst_err = |error| EventError::Port {
            port: self.dst_name.clone(),
            error,
        };
        let src_err = |error| EventError::Port {
            port: self.src_name.clone(),
            error,
        };

        let dst_id = dst.get_var_grid(&first.destination).map_err(dst_err)?;
        let src_id = src.get_var_grid(&first.source).map_err(src_err)?;
        for item in &self.items[1..] {
            if dst.get_var_grid(&item.destination).map_err(dst_err)? != dst_id {
                return Err(self.mismatch(&item.destination));
            }
            if src.get_var_grid(&item.source).map_err(src_err)? != src_id {
                return Err(self.mismatch(&item.source));
            }
        }

        let dst_grid = grid_from_port(&*dst, dst_id)?;
        let src_grid = grid_from_port(&*src, src_id)?;
        let kind = match self.requested {
            Some(kind) => kind,
            None => find_mappers(&dst_grid, &src_grid)
                .first()
                .copied()
                .ok_or_else(|| EventError::NoMapper {
                    event: self.name.clone(),
                    dst: dst_grid.kind(),
                    src: src_grid.kind(),
                })?,
        };
        let mut mapper = kind.build_with(self.reduction);
        mapper
            .initialize(&dst_grid, &src_grid)
            .map_err(|error| EventError::Map {
                event: self.name.clone(),
                error,
            })?;
        tracing::debug!(event = %self.name, mapper = %kind, "mapping initialized");
        self.mapper = Some(mapper);
        Ok(())
    }

    fn mismatch(&self, variable: &str) -> EventError {
        EventError::GridMismatch {
            event: self.name.clone(),
            variable: variable.to_string(),
        }
    }

    fn run(&mut self, time: f64) -> Result<(), EventError> {
        if self.items.is_empty() {
            return Ok(());
        }
        let mapper = self
            .mapper
            .as_deref()
            .ok_or_else(|| EventError::NotInitialized {
                event: self.name.clone(),
            })?;
        tracing::trace!(event = %self.name, time, "mapping");

        for item in &self.items {
            let src = self
                .src
                .borrow()
                .get_value(&item.source)
                .map_err(|error| EventError::Port {
                    port: self.src_name.clone(),
                    error,
                })?;
            let mut dst = self
                .dst
                .borrow()
                .get_value(&item.destination)
                .map_err(|error| EventError::Port {
                    port: self.dst_name.clone(),
                    error,
                })?;
            mapper
                .run_into(&src, &mut dst, self.bad_val)
                .map_err(|error| EventError::Map {
                    event: self.name.clone(),
                    error,
                })?;
            self.dst
                .borrow_mut()
                .set_value(&item.destination, &dst)
                .map_err(|error| EventError::Port {
                    port: self.dst_name.clone(),
                    error,
                })?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EventError> {
        tracing::debug!(event = %self.name, "mapping finalized");
        Ok(())
    }
}

impl fmt::Debug for PortMapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortMapEvent")
            .field("name", &self.name)
            .field("items", &self.items)
            .field("mapper", &self.mapper)
            .field("reduction", &self.reduction)
            .field("bad_val", &self.bad_val)
            .finish_non_exhaustive()
    }
}
