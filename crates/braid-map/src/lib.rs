//! Spatial mappers for Braid couplings.
//!
//! A [`Mapper`] moves values from a source grid onto a destination grid.
//! Three are provided:
//!
//! - [`PointToPoint`]: nearest source node per destination node
//! - [`CellToPoint`]: containing source cell per destination node
//! - [`PointToCell`]: source nodes aggregated per destination cell
//!
//! [`find_mappers`] lists the ones that accept a given grid pair. All of
//! them share the sentinel contract described in [`mapper`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cell_to_point;
pub mod error;
pub mod kdtree;
pub mod mapper;
pub mod point_to_cell;
pub mod point_to_point;
pub mod reduce;

pub use cell_to_point::CellToPoint;
pub use error::MapError;
pub use kdtree::KdTree;
pub use mapper::{find_mappers, Mapper, MapperKind};
pub use point_to_cell::PointToCell;
pub use point_to_point::PointToPoint;
pub use reduce::Reduction;
