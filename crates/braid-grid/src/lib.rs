//! Grid topologies and field storage for Braid couplings.
//!
//! This crate defines [`GridTopology`], the single representation behind
//! every grid a component can expose, and [`Field`], which attaches named
//! point- or cell-centered values to one.
//!
//! # Grid classes
//!
//! - Raster: uniform spacing and origin per axis
//! - Rectilinear: one coordinate vector per axis
//! - Structured: explicit coordinates on a lattice
//! - Unstructured: explicit nodes and cells
//!
//! Lattice grids generate their connectivity with
//! [`structured_connectivity`]; the class a grid belongs to is a lookup on
//! its [`Layout`] record rather than a type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod connectivity;
pub mod error;
pub mod field;
pub mod geometry;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use connectivity::{
    connectivity_from_padded, structured_connectivity, Connectivity, CornerOrder,
};
pub use error::GridError;
pub use field::{AddPolicy, Centering, Field};
pub use topology::{AxisValues, Capability, GridTopology, Layout, Support};
