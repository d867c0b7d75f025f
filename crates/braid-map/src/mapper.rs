//! The [`Mapper`] trait and the [`MapperKind`] catalogue.
//!
//! A mapper transfers values between two grids. It is bound to a
//! (destination, source) pair once by [`Mapper::initialize`], which
//! precomputes whatever geometric index it needs; after that every
//! [`Mapper::run_into`] is a pure transform over value buffers.
//!
//! # Sentinel values
//!
//! Every run takes a `bad_val`. Only source values strictly greater than
//! `bad_val` are transferred; every other destination entry keeps what
//! the caller's buffer held. This lets a coupling overlay a partial
//! source onto a destination's existing state.

use crate::cell_to_point::CellToPoint;
use crate::error::MapError;
use crate::point_to_cell::PointToCell;
use crate::point_to_point::PointToPoint;
use crate::reduce::Reduction;
use braid_grid::GridTopology;
use std::fmt;
use std::str::FromStr;

/// A value transfer between a destination and a source grid.
///
/// # Object safety
///
/// This trait is object-safe; couplings store mappers as
/// `Box<dyn Mapper>`.
///
/// # Examples
///
/// ```
/// use braid_grid::GridTopology;
/// use braid_map::{Mapper, PointToPoint};
///
/// let grid = GridTopology::raster(&[2, 2], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
/// let mut mapper = PointToPoint::new();
/// mapper.initialize(&grid, &grid).unwrap();
///
/// let src = [1.0, -999.0, 3.0, 4.0];
/// let mut dst = [0.5; 4];
/// mapper.run_into(&src, &mut dst, -999.0).unwrap();
/// assert_eq!(dst, [1.0, 0.5, 3.0, 4.0]);
/// ```
pub trait Mapper: fmt::Debug {
    /// Human-readable name for error reporting and logs.
    fn name(&self) -> &str;

    /// Whether this mapper can operate on the (destination, source) pair.
    fn test(&self, dst: &GridTopology, src: &GridTopology) -> bool;

    /// Bind to a (destination, source) pair, building the mapper's
    /// indices.
    ///
    /// Fails with [`MapError::IncompatibleGrid`] when [`test`](Self::test)
    /// rejects the pair. Re-initializing replaces any earlier binding.
    fn initialize(&mut self, dst: &GridTopology, src: &GridTopology) -> Result<(), MapError>;

    /// `(source, destination)` buffer lengths of the current binding, or
    /// `None` before [`initialize`](Self::initialize).
    fn sizes(&self) -> Option<(usize, usize)>;

    /// Value a freshly allocated destination buffer starts with.
    fn fill_value(&self, bad_val: f64) -> f64 {
        bad_val
    }

    /// Transfer good values of `src` into `dst` in place.
    fn run_into(&self, src: &[f64], dst: &mut [f64], bad_val: f64) -> Result<(), MapError>;

    /// Transfer good values of `src` into a freshly allocated buffer
    /// filled with [`fill_value`](Self::fill_value).
    fn run(&self, src: &[f64], bad_val: f64) -> Result<Vec<f64>, MapError> {
        let (_, dst_len) = self.sizes().ok_or_else(|| MapError::NotInitialized {
            mapper: self.name().to_string(),
        })?;
        let mut dst = vec![self.fill_value(bad_val); dst_len];
        self.run_into(src, &mut dst, bad_val)?;
        Ok(dst)
    }
}

/// Check both buffers against a binding's sizes.
pub(crate) fn check_buffers(
    mapper: &dyn Mapper,
    src: &[f64],
    dst: &[f64],
) -> Result<(), MapError> {
    let (src_len, dst_len) = mapper.sizes().ok_or_else(|| MapError::NotInitialized {
        mapper: mapper.name().to_string(),
    })?;
    if src.len() != src_len {
        return Err(MapError::SizeMismatch {
            what: "source",
            expected: src_len,
            actual: src.len(),
        });
    }
    if dst.len() != dst_len {
        return Err(MapError::SizeMismatch {
            what: "destination",
            expected: dst_len,
            actual: dst.len(),
        });
    }
    Ok(())
}

pub(crate) fn incompatible(mapper: &dyn Mapper, dst: &GridTopology, src: &GridTopology) -> MapError {
    MapError::IncompatibleGrid {
        mapper: mapper.name().to_string(),
        dst: dst.kind(),
        src: src.kind(),
    }
}

/// The available mappers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapperKind {
    /// [`PointToPoint`].
    PointToPoint,
    /// [`CellToPoint`].
    CellToPoint,
    /// [`PointToCell`].
    PointToCell,
}

impl MapperKind {
    /// Every kind, in preference order.
    pub const ALL: [MapperKind; 3] = [
        MapperKind::PointToPoint,
        MapperKind::CellToPoint,
        MapperKind::PointToCell,
    ];

    /// Name of the mapper this kind builds.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointToPoint => "PointToPoint",
            Self::CellToPoint => "CellToPoint",
            Self::PointToCell => "PointToCell",
        }
    }

    /// A fresh, uninitialized mapper of this kind.
    pub fn build(self) -> Box<dyn Mapper> {
        self.build_with(Reduction::default())
    }

    /// Like [`build`](Self::build), aggregating with `reduction` where
    /// the mapper aggregates at all ([`PointToCell`]).
    pub fn build_with(self, reduction: Reduction) -> Box<dyn Mapper> {
        match self {
            Self::PointToPoint => Box::new(PointToPoint::new()),
            Self::CellToPoint => Box::new(CellToPoint::new()),
            Self::PointToCell => Box::new(PointToCell::new().with_reduction(reduction)),
        }
    }
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapperKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MapError::UnknownMapper {
                name: s.to_string(),
            })
    }
}

/// Kinds whose mappers accept the (destination, source) pair, in
/// preference order.
pub fn find_mappers(dst: &GridTopology, src: &GridTopology) -> Vec<MapperKind> {
    MapperKind::ALL
        .into_iter()
        .filter(|kind| kind.build().test(dst, src))
        .collect()
}
