//! Error types for scheduling, event execution and configuration.

use braid_core::{GridKind, PortError};
use braid_grid::GridError;
use braid_map::MapError;
use std::error::Error;
use std::fmt;

// ── TimeError ──────────────────────────────────────────────────────

/// Errors from timeline scheduling.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeError {
    /// A time earlier than the timeline's clock was requested.
    Backward {
        /// The requested time.
        requested: f64,
        /// The timeline's current time.
        current: f64,
    },
    /// A recurrence interval that is not finite and positive.
    InvalidInterval {
        /// The rejected interval.
        value: f64,
    },
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backward { requested, current } => write!(
                f,
                "time {requested} is before the current time {current}"
            ),
            Self::InvalidInterval { value } => {
                write!(f, "interval must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for TimeError {}

// ── EventError ─────────────────────────────────────────────────────

/// Errors raised while initializing, running or finalizing events.
#[derive(Clone, Debug, PartialEq)]
pub enum EventError {
    /// A port call failed.
    Port {
        /// Name of the port.
        port: String,
        /// The port's error.
        error: PortError,
    },
    /// Building a grid from a port's description failed.
    Grid {
        /// Name of the port.
        port: String,
        /// The grid error.
        error: GridError,
    },
    /// A mapper failed.
    Map {
        /// Name of the mapping event.
        event: String,
        /// The mapper's error.
        error: MapError,
    },
    /// No mapper accepts the grid pair of a mapping event.
    NoMapper {
        /// Name of the mapping event.
        event: String,
        /// Kind of the destination grid.
        dst: GridKind,
        /// Kind of the source grid.
        src: GridKind,
    },
    /// Exchange items of one mapping event live on different grids.
    GridMismatch {
        /// Name of the mapping event.
        event: String,
        /// The variable on the unexpected grid.
        variable: String,
    },
    /// A port reports a time step that is not finite and positive.
    InvalidTimeStep {
        /// Name of the port.
        port: String,
        /// The reported step.
        value: f64,
    },
    /// A mapping event was run before being initialized.
    NotInitialized {
        /// Name of the event.
        event: String,
    },
    /// Scheduling failed.
    Time(TimeError),
    /// An earlier `initialize` failed; only `finalize` is accepted.
    InitializeFailed,
    /// The manager was used after `finalize`.
    Finalized,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port { port, error } => write!(f, "port '{port}': {error}"),
            Self::Grid { port, error } => write!(f, "grid of port '{port}': {error}"),
            Self::Map { event, error } => write!(f, "{event}: {error}"),
            Self::NoMapper { event, dst, src } => write!(
                f,
                "{event}: no mapper from a {src} grid onto a {dst} grid"
            ),
            Self::GridMismatch { event, variable } => write!(
                f,
                "{event}: variable '{variable}' is not on the grid of the first exchange item"
            ),
            Self::InvalidTimeStep { port, value } => write!(
                f,
                "port '{port}' reports time step {value}, expected finite and positive"
            ),
            Self::NotInitialized { event } => {
                write!(f, "{event} must be initialized before it is run")
            }
            Self::Time(e) => write!(f, "timeline: {e}"),
            Self::InitializeFailed => {
                write!(f, "event manager failed to initialize and must be finalized")
            }
            Self::Finalized => write!(f, "event manager is already finalized"),
        }
    }
}

impl Error for EventError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Port { error, .. } => Some(error),
            Self::Grid { error, .. } => Some(error),
            Self::Map { error, .. } => Some(error),
            Self::Time(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TimeError> for EventError {
    fn from(e: TimeError) -> Self {
        Self::Time(e)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating component configuration or
/// assembling a coupling from it.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    Parse {
        /// Parser message.
        reason: String,
    },
    /// Two components share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// A component's time step is not finite and positive.
    InvalidTimeStep {
        /// The component.
        component: String,
        /// The rejected value.
        value: f64,
    },
    /// A connection names a component that is not configured.
    UnknownConnection {
        /// The component holding the connection.
        component: String,
        /// The missing component.
        connect: String,
    },
    /// A `uses` entry that no component provides.
    Unprovided {
        /// The component that uses it.
        component: String,
        /// The variable name.
        name: String,
    },
    /// No factory is registered for a component class.
    UnknownClass {
        /// The component.
        component: String,
        /// The unregistered class.
        class: String,
    },
    /// A connection asks for a mapper that does not exist.
    UnknownMapper {
        /// The component holding the connection.
        component: String,
        /// The requested mapper name.
        mapper: String,
    },
    /// A connection asks for a reduction that does not exist.
    UnknownReduction {
        /// The component holding the connection.
        component: String,
        /// The requested reduction name.
        reduction: String,
    },
    /// A factory failed to build a component's port.
    Port {
        /// The component.
        component: String,
        /// The factory's error.
        error: PortError,
    },
    /// Scheduling a component failed.
    Event(EventError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { reason } => write!(f, "cannot parse configuration: {reason}"),
            Self::DuplicateName { name } => write!(f, "component name '{name}' is not unique"),
            Self::InvalidTimeStep { component, value } => write!(
                f,
                "component '{component}': time_step must be finite and positive, got {value}"
            ),
            Self::UnknownConnection { component, connect } => write!(
                f,
                "component '{component}' connects to unknown component '{connect}'"
            ),
            Self::Unprovided { component, name } => write!(
                f,
                "component '{component}' uses '{name}', which no component provides"
            ),
            Self::UnknownClass { component, class } => write!(
                f,
                "component '{component}': no port factory registered for class '{class}'"
            ),
            Self::UnknownMapper { component, mapper } => {
                write!(f, "component '{component}': unknown mapper '{mapper}'")
            }
            Self::UnknownReduction {
                component,
                reduction,
            } => write!(f, "component '{component}': unknown reduction '{reduction}'"),
            Self::Port { component, error } => write!(f, "component '{component}': {error}"),
            Self::Event(e) => write!(f, "scheduling: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Port { error, .. } => Some(error),
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EventError> for ConfigError {
    fn from(e: EventError) -> Self {
        Self::Event(e)
    }
}
