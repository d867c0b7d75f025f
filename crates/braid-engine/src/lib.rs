//! Scheduling and execution for Braid model couplings.
//!
//! A [`Timeline`] orders recurring and one-time events by fire time. An
//! [`EventManager`] drives [`Event`]s from a timeline through
//! `initialize`, `run` and `finalize`: stepping ports ([`PortEvent`]),
//! mapping values between them ([`PortMapEvent`]) or running a sequence
//! of both ([`ChainEvent`]).
//!
//! [`couple`] builds a ready-to-run manager from [`ComponentConfig`]s and
//! a [`ComponentRegistry`] of port factories.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coupling;
pub mod error;
pub mod event;
pub mod manager;
pub mod port_grid;
pub mod registry;
pub mod timeline;

pub use config::{
    load_components, validate_components, ComponentConfig, ConnectionConfig, ExchangeItem,
};
pub use coupling::{couple, Coupling};
pub use error::{ConfigError, EventError, TimeError};
pub use event::{ChainEvent, Event, EventRef, PortEvent, PortMapEvent, DEFAULT_BAD_VAL};
pub use manager::{EventManager, ManagerState};
pub use port_grid::grid_from_port;
pub use registry::{ComponentRegistry, PortFactory};
pub use timeline::{IterUntil, Timeline};
