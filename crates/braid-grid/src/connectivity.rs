//! Connectivity generation for structured lattices.
//!
//! A structured lattice of shape `(n_z, n_y, n_x)` has one cell per
//! *interior* node: a node whose index along every axis is below that
//! axis's extent minus one. The cell spans the unit hypercube whose lower
//! corner is that node, so it lists `2^d` node ids.

use crate::error::GridError;
use braid_core::{Shape, MAX_RANK};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Order in which a cell's corner nodes are listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CornerOrder {
    /// Ring order `0, 1, s+1, s` around each face (`cw`).
    #[default]
    Clockwise,
    /// Ring order `0, s, s+1, 1` around each face (`ccw`).
    CounterClockwise,
    /// Plain lattice order `0, 1, s, s+1` (`none`). Cheaper, but faces
    /// are not rings, so polygon queries do not apply.
    Unordered,
}

impl CornerOrder {
    /// Short name as used in configuration (`cw`, `ccw`, `none`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clockwise => "cw",
            Self::CounterClockwise => "ccw",
            Self::Unordered => "none",
        }
    }
}

impl fmt::Display for CornerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ragged cell→node mapping in flat form.
///
/// Cell `i` lists `connectivity[offset[i - 1]..offset[i]]`, with
/// `offset[-1]` taken as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connectivity {
    /// Node ids of every cell, concatenated.
    pub connectivity: Vec<usize>,
    /// End index of each cell within `connectivity`.
    pub offset: Vec<usize>,
}

impl Connectivity {
    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.offset.len()
    }

    /// Node ids of one cell.
    pub fn cell(&self, cell: usize) -> &[usize] {
        let start = if cell == 0 { 0 } else { self.offset[cell - 1] };
        &self.connectivity[start..self.offset[cell]]
    }
}

/// Check that a lattice shape has 1 to 3 axes and no zero extent.
pub fn validate_shape(shape: &[usize]) -> Result<(), GridError> {
    if shape.is_empty() || shape.len() > MAX_RANK {
        return Err(GridError::InvalidShape {
            reason: format!("expected 1 to {MAX_RANK} axes, got {}", shape.len()),
        });
    }
    if let Some(axis) = shape.iter().position(|&n| n == 0) {
        return Err(GridError::InvalidShape {
            reason: format!("axis {axis} has zero nodes"),
        });
    }
    Ok(())
}

/// Row-major strides: the fastest (last) axis has stride 1.
pub fn strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = smallvec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Ids of the interior nodes in row-major order, one per cell.
pub fn interior_ids(shape: &[usize]) -> Vec<usize> {
    let strides = strides(shape);
    let node_count: usize = shape.iter().product();
    (0..node_count)
        .filter(|&id| {
            let mut rem = id;
            shape.iter().zip(strides.iter()).all(|(&extent, &stride)| {
                let index = rem / stride;
                rem %= stride;
                index + 1 < extent
            })
        })
        .collect()
}

/// The `2^d` corner offsets of a cell relative to its interior node.
pub fn corner_offsets(shape: &[usize], order: CornerOrder) -> SmallVec<[usize; 8]> {
    let strides = strides(shape);
    let d = shape.len();

    if order == CornerOrder::Unordered || d == 1 {
        let mut offsets: SmallVec<[usize; 8]> = smallvec![0];
        for &stride in strides.iter().rev() {
            let shifted: SmallVec<[usize; 8]> = offsets.iter().map(|o| o + stride).collect();
            offsets.extend(shifted);
        }
        return offsets;
    }

    // Face ring over the two fastest axes, repeated on the next plane in 3-D.
    let row = strides[d - 2];
    let ring: [usize; 4] = match order {
        CornerOrder::CounterClockwise => [0, row, row + 1, 1],
        _ => [0, 1, row + 1, row],
    };
    let mut offsets: SmallVec<[usize; 8]> = SmallVec::from_slice(&ring);
    if d == 3 {
        let plane = strides[0];
        offsets.extend(ring.iter().map(|o| o + plane));
    }
    offsets
}

/// Build the connectivity of a structured lattice.
///
/// # Examples
///
/// ```
/// use braid_grid::connectivity::{structured_connectivity, CornerOrder};
///
/// let c = structured_connectivity(&[2, 3], CornerOrder::Clockwise).unwrap();
/// assert_eq!(c.connectivity, vec![0, 1, 4, 3, 1, 2, 5, 4]);
/// assert_eq!(c.offset, vec![4, 8]);
/// ```
pub fn structured_connectivity(
    shape: &[usize],
    order: CornerOrder,
) -> Result<Connectivity, GridError> {
    validate_shape(shape)?;
    let interior = interior_ids(shape);
    let corners = corner_offsets(shape, order);
    let per_cell = corners.len();

    let mut connectivity = Vec::with_capacity(interior.len() * per_cell);
    for &base in &interior {
        connectivity.extend(corners.iter().map(|&c| base + c));
    }
    let offset = (1..=interior.len()).map(|k| k * per_cell).collect();

    Ok(Connectivity {
        connectivity,
        offset,
    })
}

/// Flatten a padded cell→node matrix into connectivity and offsets.
///
/// `matrix` is row-major with `width` columns. Each row contributes its
/// entries up to the first occurrence of `fill`.
pub fn connectivity_from_padded(
    matrix: &[i64],
    width: usize,
    fill: i64,
) -> Result<Connectivity, GridError> {
    if width == 0 || matrix.len() % width != 0 {
        return Err(GridError::InvalidConnectivity {
            reason: format!(
                "matrix of {} entries is not a whole number of rows of width {width}",
                matrix.len()
            ),
        });
    }

    let mut connectivity = Vec::with_capacity(matrix.len());
    let mut offset = Vec::with_capacity(matrix.len() / width);
    for (row, entries) in matrix.chunks_exact(width).enumerate() {
        let len = entries.iter().position(|&v| v == fill).unwrap_or(width);
        if len == 0 {
            return Err(GridError::EmptyCell { row });
        }
        for &node in &entries[..len] {
            let node = usize::try_from(node).map_err(|_| GridError::InvalidConnectivity {
                reason: format!("row {row} holds negative node id {node}"),
            })?;
            connectivity.push(node);
        }
        offset.push(connectivity.len());
    }

    Ok(Connectivity {
        connectivity,
        offset,
    })
}
