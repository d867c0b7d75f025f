//! Braid: couple grid-based simulation components.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Braid sub-crates. For most users, adding `braid` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use braid::prelude::*;
//!
//! // A 3 × 4 node raster and the same lattice described axis by axis.
//! let raster = GridTopology::raster(&[3, 4], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
//! let rect = GridTopology::rectilinear(vec![
//!     vec![0.0, 1.0, 2.0],
//!     vec![0.0, 1.0, 2.0, 3.0],
//! ])
//! .unwrap();
//! assert_eq!(find_mappers(&rect, &raster)[0], MapperKind::PointToPoint);
//!
//! // Copy node values across, skipping anything at or below -999.
//! let mut mapper = PointToPoint::new();
//! mapper.initialize(&rect, &raster).unwrap();
//! let mut src: Vec<f64> = (0..12).map(f64::from).collect();
//! src[5] = -999.0;
//! let mut dst = vec![0.5; 12];
//! mapper.run_into(&src, &mut dst, -999.0).unwrap();
//! assert_eq!(dst[4], 4.0);
//! assert_eq!(dst[5], 0.5);
//!
//! // Two recurring events on one timeline.
//! let mut timeline = Timeline::new();
//! timeline.add_recurring_event("ocean", 2.0).unwrap();
//! timeline.add_recurring_event("river", 1.0).unwrap();
//! assert_eq!(timeline.pop_until(2.0).unwrap(), vec!["river", "ocean", "river"]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `braid-core` | IDs, grid kinds, the `Port` trait |
//! | [`grid`] | `braid-grid` | Grid topologies, connectivity generation, fields |
//! | [`map`] | `braid-map` | Grid-to-grid mappers |
//! | [`engine`] | `braid-engine` | Timeline, events, event manager, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`braid-core`).
///
/// Contains [`types::GridKind`], [`types::GridId`] and the [`types::Port`]
/// contract that wrapped components implement.
pub use braid_core as types;

/// Grid topologies and fields (`braid-grid`).
///
/// [`grid::GridTopology`] covers raster, rectilinear, structured and
/// unstructured grids; [`grid::Field`] attaches named values to one.
pub use braid_grid as grid;

/// Grid-to-grid mappers (`braid-map`).
///
/// [`map::PointToPoint`], [`map::CellToPoint`] and [`map::PointToCell`],
/// all behind the [`map::Mapper`] trait.
pub use braid_map as map;

/// Scheduling and coupling (`braid-engine`).
///
/// [`engine::Timeline`] for time-ordered events, [`engine::EventManager`]
/// for driving them, [`engine::couple`] for building a coupling from
/// configuration.
pub use braid_engine as engine;

/// Common imports for typical Braid usage.
///
/// ```rust
/// use braid::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use braid_core::{share, GridId, GridKind, Port, PortError, SharedPort};

    // Grids and fields
    pub use braid_grid::{AddPolicy, Centering, Field, GridError, GridTopology};

    // Mapping
    pub use braid_map::{
        find_mappers, CellToPoint, MapError, Mapper, MapperKind, PointToCell, PointToPoint,
        Reduction,
    };

    // Engine
    pub use braid_engine::{
        couple, ChainEvent, ComponentConfig, ComponentRegistry, ConfigError, EventError,
        EventManager, EventRef, PortEvent, PortMapEvent, TimeError, Timeline,
    };
}
