//! The unified grid representation.
//!
//! Every grid, whatever its class, is a [`GridTopology`]: per-node
//! coordinates, a flat cell→node connectivity with end offsets, and a
//! [`Layout`] capability record saying which coordinate-generation
//! strategy built it. Classification is a lookup on that record.
//!
//! # Coordinate order
//!
//! Coordinates are stored as a `dim × point_count` matrix whose rows run
//! from the slowest to the fastest axis: `[y, x]` in 2-D, `[z, y, x]` in
//! 3-D. Points passed to queries use the same order.
//!
//! # Caches
//!
//! A topology never changes after construction. The shared-cell index and
//! the cell centroids are derived on first use and memoized in a
//! [`OnceLock`], so they are computed at most once per grid.

use crate::connectivity::{
    strides, structured_connectivity, validate_shape, Connectivity, CornerOrder,
};
use crate::error::GridError;
use crate::geometry;
use braid_core::{GridKind, Shape, MAX_RANK};
use smallvec::SmallVec;
use std::sync::OnceLock;

/// Per-axis floating-point parameters (spacing, origin).
pub type AxisValues = SmallVec<[f64; 3]>;

/// How a grid's node coordinates are generated.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Uniformly spaced lattice.
    Raster {
        /// Node counts per axis.
        shape: Shape,
        /// Node spacing per axis.
        spacing: AxisValues,
        /// Coordinates of node 0 per axis.
        origin: AxisValues,
        /// Distinct coordinates along each axis.
        axes: Vec<Vec<f64>>,
    },
    /// Lattice with an independent coordinate vector per axis.
    Rectilinear {
        /// Node counts per axis.
        shape: Shape,
        /// Distinct coordinates along each axis.
        axes: Vec<Vec<f64>>,
    },
    /// Lattice with explicit coordinates for every node.
    Structured {
        /// Node counts per axis.
        shape: Shape,
    },
    /// Explicit nodes and cells with no lattice.
    Unstructured,
}

impl Layout {
    /// Topology class of the layout.
    pub fn kind(&self) -> GridKind {
        match self {
            Self::Raster { .. } => GridKind::Raster,
            Self::Rectilinear { .. } => GridKind::Rectilinear,
            Self::Structured { .. } => GridKind::Structured,
            Self::Unstructured => GridKind::Unstructured,
        }
    }

    /// Lattice shape, if the layout has one.
    pub fn shape(&self) -> Option<&[usize]> {
        match self {
            Self::Raster { shape, .. }
            | Self::Rectilinear { shape, .. }
            | Self::Structured { shape } => Some(shape.as_slice()),
            Self::Unstructured => None,
        }
    }

    /// Per-axis coordinate vectors, if the layout has them.
    pub fn axes(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Raster { axes, .. } | Self::Rectilinear { axes, .. } => Some(axes.as_slice()),
            _ => None,
        }
    }

    /// Whether the layout provides `capability`.
    pub fn supports(&self, capability: Capability) -> Support {
        let kind = self.kind();
        if kind == GridKind::Unstructured {
            return match capability {
                Capability::NodeCoordinates => Support::Supported,
                _ => Support::NotApplicable,
            };
        }
        let needs = match capability {
            Capability::NodeCoordinates | Capability::Shape => GridKind::Structured,
            Capability::AxisCoordinates => GridKind::Rectilinear,
            Capability::Spacing | Capability::Origin => GridKind::Raster,
        };
        if kind.refines(needs) {
            Support::Supported
        } else {
            Support::Unsupported
        }
    }
}

/// A coordinate-generation capability a grid may provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Explicit coordinates for every node (all grids).
    NodeCoordinates,
    /// A regular lattice shape.
    Shape,
    /// One distinct coordinate vector per axis.
    AxisCoordinates,
    /// Uniform node spacing.
    Spacing,
    /// A lattice origin.
    Origin,
}

/// Answer to a capability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Support {
    /// The grid provides the capability.
    Supported,
    /// The grid has a lattice but not this capability (e.g. spacing on a
    /// rectilinear grid).
    Unsupported,
    /// The capability is meaningless for this grid (e.g. shape on an
    /// unstructured mesh).
    NotApplicable,
}

/// Cells touching each point, in compressed-row form.
#[derive(Clone, Debug)]
struct SharedCells {
    start: Vec<usize>,
    cells: Vec<usize>,
}

impl SharedCells {
    fn build(point_count: usize, cells: &Connectivity) -> Self {
        let mut per_point: Vec<Vec<usize>> = vec![Vec::new(); point_count];
        for cell in 0..cells.cell_count() {
            for &node in cells.cell(cell) {
                let list = &mut per_point[node];
                if list.last() != Some(&cell) {
                    list.push(cell);
                }
            }
        }
        let mut start = Vec::with_capacity(point_count + 1);
        start.push(0);
        let mut flat = Vec::new();
        for list in per_point {
            flat.extend(list);
            start.push(flat.len());
        }
        Self { start, cells: flat }
    }

    fn of(&self, point: usize) -> &[usize] {
        &self.cells[self.start[point]..self.start[point + 1]]
    }
}

/// A grid of any topology class.
///
/// # Examples
///
/// ```
/// use braid_grid::GridTopology;
///
/// let grid = GridTopology::raster(&[2, 3], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
/// assert_eq!(grid.point_count(), 6);
/// assert_eq!(grid.cell_count(), 2);
/// assert_eq!(grid.connectivity(), &[0, 1, 4, 3, 1, 2, 5, 4]);
/// assert_eq!(grid.offset(), &[4, 8]);
/// assert_eq!(grid.x().unwrap(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
/// assert!(grid.z().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GridTopology {
    layout: Layout,
    coords: Vec<Vec<f64>>,
    cells: Connectivity,
    names: Vec<String>,
    units: Vec<String>,
    shared: OnceLock<SharedCells>,
    centroids: OnceLock<Vec<Vec<f64>>>,
}

impl GridTopology {
    /// Build a uniformly spaced lattice.
    ///
    /// `shape`, `spacing` and `origin` are ordered slow→fast and must have
    /// the same length. Spacing must be finite and positive.
    pub fn raster(shape: &[usize], spacing: &[f64], origin: &[f64]) -> Result<Self, GridError> {
        validate_shape(shape)?;
        if spacing.len() != shape.len() || origin.len() != shape.len() {
            return Err(GridError::InvalidCoordinates {
                reason: format!(
                    "shape has {} axes but spacing has {} and origin has {}",
                    shape.len(),
                    spacing.len(),
                    origin.len()
                ),
            });
        }
        if let Some(axis) = spacing.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(GridError::InvalidCoordinates {
                reason: format!("spacing along axis {axis} must be finite and positive"),
            });
        }
        if let Some(axis) = origin.iter().position(|o| !o.is_finite()) {
            return Err(GridError::InvalidCoordinates {
                reason: format!("origin along axis {axis} is not finite"),
            });
        }

        let axes: Vec<Vec<f64>> = shape
            .iter()
            .zip(spacing.iter().zip(origin.iter()))
            .map(|(&n, (&d, &o))| (0..n).map(|k| o + k as f64 * d).collect())
            .collect();
        let coords = expand_axes(shape, &axes);
        let layout = Layout::Raster {
            shape: Shape::from_slice(shape),
            spacing: AxisValues::from_slice(spacing),
            origin: AxisValues::from_slice(origin),
            axes,
        };
        Self::from_lattice(layout, coords)
    }

    /// Build a lattice from one coordinate vector per axis, slow→fast.
    ///
    /// Each vector must be non-empty, finite and strictly monotonic.
    pub fn rectilinear(axes: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let shape: Shape = axes.iter().map(Vec::len).collect();
        validate_shape(&shape)?;
        for (axis, values) in axes.iter().enumerate() {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(GridError::InvalidCoordinates {
                    reason: format!("axis {axis} has non-finite coordinates"),
                });
            }
            let increasing = values.windows(2).all(|w| w[0] < w[1]);
            let decreasing = values.windows(2).all(|w| w[0] > w[1]);
            if !(increasing || decreasing) {
                return Err(GridError::InvalidCoordinates {
                    reason: format!("axis {axis} is not strictly monotonic"),
                });
            }
        }
        let coords = expand_axes(&shape, &axes);
        Self::from_lattice(Layout::Rectilinear { shape, axes }, coords)
    }

    /// Build a lattice with explicit coordinates for every node.
    ///
    /// `coords` holds one row per axis (slow→fast), each with
    /// `shape.iter().product()` entries in row-major node order.
    pub fn structured(shape: &[usize], coords: Vec<Vec<f64>>) -> Result<Self, GridError> {
        validate_shape(shape)?;
        let point_count: usize = shape.iter().product();
        check_coordinate_rows(&coords, Some(shape.len()), point_count)?;
        Self::from_lattice(
            Layout::Structured {
                shape: Shape::from_slice(shape),
            },
            coords,
        )
    }

    /// Build a mesh from explicit nodes and cells.
    ///
    /// `coords` holds one row per axis (slow→fast). `offset` must be
    /// strictly increasing, end at `connectivity.len()`, and every
    /// connectivity entry must name an existing node.
    pub fn unstructured(
        coords: Vec<Vec<f64>>,
        connectivity: Vec<usize>,
        offset: Vec<usize>,
    ) -> Result<Self, GridError> {
        let point_count = coords.first().map_or(0, Vec::len);
        check_coordinate_rows(&coords, None, point_count)?;
        let cells = Connectivity {
            connectivity,
            offset,
        };
        check_connectivity(&cells, point_count)?;
        Ok(Self::assemble(Layout::Unstructured, coords, cells))
    }

    fn from_lattice(layout: Layout, coords: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let shape = layout.shape().unwrap_or(&[]);
        let cells = structured_connectivity(shape, CornerOrder::Clockwise)?;
        Ok(Self::assemble(layout, coords, cells))
    }

    fn assemble(layout: Layout, coords: Vec<Vec<f64>>, cells: Connectivity) -> Self {
        let dim = coords.len();
        let names = ["z", "y", "x"][MAX_RANK - dim..]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            layout,
            coords,
            cells,
            names,
            units: vec!["-".to_string(); dim],
            shared: OnceLock::new(),
            centroids: OnceLock::new(),
        }
    }

    /// Regenerate a lattice's connectivity with a different corner order.
    ///
    /// Fails with [`GridError::GridType`] on unstructured grids, whose
    /// connectivity is given rather than generated.
    pub fn with_corner_order(mut self, order: CornerOrder) -> Result<Self, GridError> {
        let shape = self.shape()?.to_vec();
        self.cells = structured_connectivity(&shape, order)?;
        self.shared = OnceLock::new();
        self.centroids = OnceLock::new();
        Ok(self)
    }

    /// Replace the per-axis coordinate names (slow→fast).
    pub fn with_coordinate_names(mut self, names: &[&str]) -> Result<Self, GridError> {
        self.names = self.per_axis_strings(names)?;
        Ok(self)
    }

    /// Replace the per-axis coordinate units (slow→fast).
    pub fn with_coordinate_units(mut self, units: &[&str]) -> Result<Self, GridError> {
        self.units = self.per_axis_strings(units)?;
        Ok(self)
    }

    fn per_axis_strings(&self, values: &[&str]) -> Result<Vec<String>, GridError> {
        if values.len() != self.dim() {
            return Err(GridError::InvalidCoordinates {
                reason: format!(
                    "expected {} per-axis entries, got {}",
                    self.dim(),
                    values.len()
                ),
            });
        }
        Ok(values.iter().map(|s| s.to_string()).collect())
    }

    // ── Classification ──────────────────────────────────────────

    /// The capability record.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Topology class.
    pub fn kind(&self) -> GridKind {
        self.layout.kind()
    }

    /// Whether the grid provides `capability`.
    pub fn supports(&self, capability: Capability) -> Support {
        self.layout.supports(capability)
    }

    fn require(&self, needs: GridKind) -> Result<(), GridError> {
        if self.kind().refines(needs) {
            Ok(())
        } else {
            Err(GridError::GridType {
                expected: needs,
                actual: self.kind(),
            })
        }
    }

    // ── Counts ──────────────────────────────────────────────────

    /// Number of axes (1 to 3).
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Number of nodes.
    pub fn point_count(&self) -> usize {
        self.coords.first().map_or(0, Vec::len)
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Total number of cell→node entries (`connectivity().len()`).
    pub fn vertex_count(&self) -> usize {
        self.cells.connectivity.len()
    }

    // ── Lattice parameters ──────────────────────────────────────

    /// Node counts per axis, slow→fast.
    pub fn shape(&self) -> Result<&[usize], GridError> {
        self.layout.shape().ok_or(GridError::GridType {
            expected: GridKind::Structured,
            actual: self.kind(),
        })
    }

    /// Node spacing per axis (rasters only).
    pub fn spacing(&self) -> Result<&[f64], GridError> {
        match &self.layout {
            Layout::Raster { spacing, .. } => Ok(spacing.as_slice()),
            _ => Err(GridError::GridType {
                expected: GridKind::Raster,
                actual: self.kind(),
            }),
        }
    }

    /// Coordinates of node 0 per axis (rasters only).
    pub fn origin(&self) -> Result<&[f64], GridError> {
        match &self.layout {
            Layout::Raster { origin, .. } => Ok(origin.as_slice()),
            _ => Err(GridError::GridType {
                expected: GridKind::Raster,
                actual: self.kind(),
            }),
        }
    }

    // ── Connectivity ────────────────────────────────────────────

    /// Node ids of every cell, concatenated.
    pub fn connectivity(&self) -> &[usize] {
        &self.cells.connectivity
    }

    /// End index of each cell within [`connectivity`](Self::connectivity).
    pub fn offset(&self) -> &[usize] {
        &self.cells.offset
    }

    /// Node ids of one cell.
    pub fn cell_nodes(&self, cell: usize) -> Result<&[usize], GridError> {
        self.check_cell(cell)?;
        Ok(self.cells.cell(cell))
    }

    /// Size of the smallest cell, in nodes (`None` for a grid without cells).
    pub fn min_nodes_per_cell(&self) -> Option<usize> {
        (0..self.cell_count()).map(|c| self.cells.cell(c).len()).min()
    }

    fn check_cell(&self, cell: usize) -> Result<(), GridError> {
        if cell < self.cell_count() {
            Ok(())
        } else {
            Err(GridError::CellOutOfRange {
                cell,
                count: self.cell_count(),
            })
        }
    }

    // ── Coordinates ─────────────────────────────────────────────

    /// Per-node coordinates along `axis` (0 = slowest).
    pub fn coordinate(&self, axis: usize) -> Result<&[f64], GridError> {
        self.coords
            .get(axis)
            .map(Vec::as_slice)
            .ok_or(GridError::UnknownDimension {
                axis,
                rank: self.dim(),
            })
    }

    /// All per-node coordinates, one row per axis (slow→fast).
    pub fn coordinates(&self) -> &[Vec<f64>] {
        &self.coords
    }

    /// Coordinates of one node, slow→fast.
    pub fn point(&self, point: usize) -> Result<AxisValues, GridError> {
        if point >= self.point_count() {
            return Err(GridError::PointOutOfRange {
                point,
                count: self.point_count(),
            });
        }
        Ok(self.coords.iter().map(|row| row[point]).collect())
    }

    /// Coordinates along the `k`-th fastest axis (x = 0, y = 1, z = 2).
    fn fast_axis(&self, k: usize) -> Result<&[f64], GridError> {
        if k >= self.dim() {
            return Err(GridError::UnknownDimension {
                axis: k,
                rank: self.dim(),
            });
        }
        self.coordinate(self.dim() - 1 - k)
    }

    /// Per-node `x` (fastest axis) coordinates.
    pub fn x(&self) -> Result<&[f64], GridError> {
        self.fast_axis(0)
    }

    /// Per-node `y` coordinates; fails on 1-D grids.
    pub fn y(&self) -> Result<&[f64], GridError> {
        self.fast_axis(1)
    }

    /// Per-node `z` coordinates; fails on 1-D and 2-D grids.
    pub fn z(&self) -> Result<&[f64], GridError> {
        self.fast_axis(2)
    }

    /// Distinct coordinates along `axis` (rasters and rectilinear grids).
    pub fn axis_coordinates(&self, axis: usize) -> Result<&[f64], GridError> {
        if axis >= self.dim() {
            return Err(GridError::UnknownDimension {
                axis,
                rank: self.dim(),
            });
        }
        self.require(GridKind::Rectilinear)?;
        match self.layout.axes() {
            Some(axes) => Ok(axes[axis].as_slice()),
            None => Err(GridError::GridType {
                expected: GridKind::Rectilinear,
                actual: self.kind(),
            }),
        }
    }

    /// Name of the coordinate along `axis`.
    pub fn coordinate_name(&self, axis: usize) -> Result<&str, GridError> {
        self.names
            .get(axis)
            .map(String::as_str)
            .ok_or(GridError::UnknownDimension {
                axis,
                rank: self.dim(),
            })
    }

    /// Units of the coordinate along `axis`.
    pub fn coordinate_units(&self, axis: usize) -> Result<&str, GridError> {
        self.units
            .get(axis)
            .map(String::as_str)
            .ok_or(GridError::UnknownDimension {
                axis,
                rank: self.dim(),
            })
    }

    // ── Derived, cached queries ─────────────────────────────────

    /// Cells that list `point` among their nodes, ascending.
    pub fn shared_cells(&self, point: usize) -> Result<&[usize], GridError> {
        if point >= self.point_count() {
            return Err(GridError::PointOutOfRange {
                point,
                count: self.point_count(),
            });
        }
        Ok(self.shared_index().of(point))
    }

    fn shared_index(&self) -> &SharedCells {
        self.shared
            .get_or_init(|| SharedCells::build(self.point_count(), &self.cells))
    }

    /// Vertex-mean centroid of every cell, one row per axis (slow→fast).
    pub fn cell_centroids(&self) -> &[Vec<f64>] {
        self.centroids.get_or_init(|| {
            self.coords
                .iter()
                .map(|row| {
                    (0..self.cell_count())
                        .map(|cell| {
                            let nodes = self.cells.cell(cell);
                            geometry::vertex_mean(nodes.iter().map(|&n| row[n]), nodes.len())
                        })
                        .collect()
                })
                .collect()
        })
    }

    /// Closed containment test of `point` (slow→fast) in `cell`.
    ///
    /// 1-D cells are intervals, 2-D cells are polygons over their node
    /// ring, and 3-D cells are approximated by their nodes' bounding box
    /// (exact for lattice hexahedra).
    pub fn contains_point(&self, point: &[f64], cell: usize) -> Result<bool, GridError> {
        self.check_cell(cell)?;
        if point.len() != self.dim() {
            return Err(GridError::InvalidCoordinates {
                reason: format!(
                    "query point has {} axes, grid has {}",
                    point.len(),
                    self.dim()
                ),
            });
        }
        let nodes = self.cells.cell(cell);
        let contained = match self.dim() {
            1 => {
                let xs = &self.coords[0];
                let (lo, hi) = bounds(nodes.iter().map(|&n| xs[n]));
                geometry::segment_contains(point[0], lo, hi)
            }
            2 => {
                let (ys, xs) = (&self.coords[0], &self.coords[1]);
                let ring: SmallVec<[(f64, f64); 8]> =
                    nodes.iter().map(|&n| (xs[n], ys[n])).collect();
                geometry::polygon_contains(point[1], point[0], &ring)
            }
            _ => {
                let (lo, hi): (AxisValues, AxisValues) = self
                    .coords
                    .iter()
                    .map(|row| bounds(nodes.iter().map(|&n| row[n])))
                    .unzip();
                geometry::box_contains(point, &lo, &hi)
            }
        };
        Ok(contained)
    }

    /// Closed point-in-polygon test of `(x, y)` against a 2-D cell.
    pub fn is_in_cell(&self, x: f64, y: f64, cell: usize) -> Result<bool, GridError> {
        if self.dim() != 2 {
            return Err(GridError::UnknownDimension {
                axis: 1,
                rank: self.dim(),
            });
        }
        self.contains_point(&[y, x], cell)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Expand per-axis vectors into per-node coordinates (row-major).
fn expand_axes(shape: &[usize], axes: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let strides = strides(shape);
    let point_count: usize = shape.iter().product();
    axes.iter()
        .enumerate()
        .map(|(axis, values)| {
            (0..point_count)
                .map(|id| values[(id / strides[axis]) % shape[axis]])
                .collect()
        })
        .collect()
}

fn check_coordinate_rows(
    coords: &[Vec<f64>],
    rank: Option<usize>,
    point_count: usize,
) -> Result<(), GridError> {
    if coords.is_empty() || coords.len() > MAX_RANK {
        return Err(GridError::InvalidCoordinates {
            reason: format!("expected 1 to {MAX_RANK} coordinate rows, got {}", coords.len()),
        });
    }
    if let Some(rank) = rank {
        if coords.len() != rank {
            return Err(GridError::InvalidCoordinates {
                reason: format!("shape has {rank} axes, got {} coordinate rows", coords.len()),
            });
        }
    }
    for (axis, row) in coords.iter().enumerate() {
        if row.len() != point_count {
            return Err(GridError::InvalidCoordinates {
                reason: format!(
                    "coordinate row {axis} has {} entries, expected {point_count}",
                    row.len()
                ),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidCoordinates {
                reason: format!("coordinate row {axis} has non-finite entries"),
            });
        }
    }
    Ok(())
}

fn check_connectivity(cells: &Connectivity, point_count: usize) -> Result<(), GridError> {
    let mut previous = 0;
    for (cell, &end) in cells.offset.iter().enumerate() {
        if end <= previous {
            return Err(GridError::InvalidConnectivity {
                reason: format!("offset of cell {cell} ({end}) does not increase past {previous}"),
            });
        }
        previous = end;
    }
    if previous != cells.connectivity.len() {
        return Err(GridError::InvalidConnectivity {
            reason: format!(
                "offsets end at {previous} but connectivity has {} entries",
                cells.connectivity.len()
            ),
        });
    }
    if let Some(&node) = cells.connectivity.iter().find(|&&n| n >= point_count) {
        return Err(GridError::InvalidConnectivity {
            reason: format!("node {node} out of range for {point_count} points"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn raster_2x3() -> GridTopology {
        GridTopology::raster(&[2, 3], &[1.0, 1.0], &[0.0, 0.0]).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn raster_counts_and_connectivity() {
        let g = raster_2x3();
        assert_eq!(g.kind(), GridKind::Raster);
        assert_eq!(g.dim(), 2);
        assert_eq!(g.point_count(), 6);
        assert_eq!(g.cell_count(), 2);
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.connectivity(), &[0, 1, 4, 3, 1, 2, 5, 4]);
        assert_eq!(g.offset(), &[4, 8]);
        assert_eq!(g.shape().unwrap(), &[2, 3]);
        assert_eq!(g.y().unwrap(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rectilinear_line() {
        let g = GridTopology::rectilinear(vec![vec![1.0, 3.0, 4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(g.kind(), GridKind::Rectilinear);
        assert_eq!(g.connectivity(), &[0, 1, 1, 2, 2, 3, 3, 4]);
        assert_eq!(g.offset(), &[2, 4, 6, 8]);
        assert_eq!(g.axis_coordinates(0).unwrap(), &[1.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn rectilinear_rejects_non_monotonic_axis() {
        let err = GridTopology::rectilinear(vec![vec![0.0, 2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, GridError::InvalidCoordinates { .. }));
    }

    #[test]
    fn raster_rejects_bad_spacing() {
        assert!(GridTopology::raster(&[2, 2], &[1.0, 0.0], &[0.0, 0.0]).is_err());
        assert!(GridTopology::raster(&[2, 2], &[1.0], &[0.0, 0.0]).is_err());
        assert!(GridTopology::raster(&[2, 2], &[1.0, f64::NAN], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn structured_requires_one_coordinate_per_node() {
        let ok = GridTopology::structured(
            &[2, 2],
            vec![vec![0.0, 0.1, 1.0, 1.2], vec![0.0, 1.0, 0.2, 1.1]],
        );
        assert!(ok.is_ok());
        let short = GridTopology::structured(&[2, 2], vec![vec![0.0; 4], vec![0.0; 3]]);
        assert!(matches!(short, Err(GridError::InvalidCoordinates { .. })));
    }

    #[test]
    fn unstructured_validates_offsets_eagerly() {
        let coords = vec![vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]];
        assert!(GridTopology::unstructured(coords.clone(), vec![0, 1, 2], vec![3]).is_ok());
        // Not strictly increasing.
        assert!(matches!(
            GridTopology::unstructured(coords.clone(), vec![0, 1, 2], vec![3, 3]),
            Err(GridError::InvalidConnectivity { .. })
        ));
        // Does not end at the connectivity length.
        assert!(matches!(
            GridTopology::unstructured(coords.clone(), vec![0, 1, 2], vec![2]),
            Err(GridError::InvalidConnectivity { .. })
        ));
        // Node out of range.
        assert!(matches!(
            GridTopology::unstructured(coords, vec![0, 1, 3], vec![3]),
            Err(GridError::InvalidConnectivity { .. })
        ));
    }

    // ── Accessors ───────────────────────────────────────────────

    #[test]
    fn axis_accessors_beyond_rank_fail() {
        let g = raster_2x3();
        assert_eq!(
            g.z().unwrap_err(),
            GridError::UnknownDimension { axis: 2, rank: 2 }
        );
        assert!(g.coordinate(2).is_err());
        assert!(g.coordinate_name(2).is_err());
        let line = GridTopology::raster(&[4], &[0.5], &[1.0]).unwrap();
        assert!(line.y().is_err());
        assert_eq!(line.x().unwrap(), &[1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn lattice_accessors_by_kind() {
        let raster = raster_2x3();
        assert_eq!(raster.spacing().unwrap(), &[1.0, 1.0]);
        assert_eq!(raster.origin().unwrap(), &[0.0, 0.0]);
        assert_eq!(raster.axis_coordinates(1).unwrap(), &[0.0, 1.0, 2.0]);

        let structured =
            GridTopology::structured(&[1, 2], vec![vec![0.0, 0.5], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            structured.spacing(),
            Err(GridError::GridType {
                expected: GridKind::Raster,
                actual: GridKind::Structured
            })
        ));
        assert!(structured.axis_coordinates(0).is_err());
        assert_eq!(structured.shape().unwrap(), &[1, 2]);

        let mesh = GridTopology::unstructured(vec![vec![0.0, 1.0]], vec![0, 1], vec![2]).unwrap();
        assert!(mesh.shape().is_err());
    }

    #[test]
    fn capability_queries_are_tri_state() {
        let rect = GridTopology::rectilinear(vec![vec![0.0, 1.0], vec![0.0, 2.0, 3.0]]).unwrap();
        assert_eq!(rect.supports(Capability::Shape), Support::Supported);
        assert_eq!(rect.supports(Capability::AxisCoordinates), Support::Supported);
        assert_eq!(rect.supports(Capability::Spacing), Support::Unsupported);

        let mesh = GridTopology::unstructured(vec![vec![0.0, 1.0]], vec![0, 1], vec![2]).unwrap();
        assert_eq!(mesh.supports(Capability::NodeCoordinates), Support::Supported);
        assert_eq!(mesh.supports(Capability::Shape), Support::NotApplicable);
        assert_eq!(mesh.supports(Capability::Origin), Support::NotApplicable);
    }

    #[test]
    fn coordinate_metadata_defaults_and_overrides() {
        let g = raster_2x3();
        assert_eq!(g.coordinate_name(0).unwrap(), "y");
        assert_eq!(g.coordinate_name(1).unwrap(), "x");
        assert_eq!(g.coordinate_units(1).unwrap(), "-");
        let g = g
            .with_coordinate_names(&["lat", "lon"])
            .unwrap()
            .with_coordinate_units(&["deg", "deg"])
            .unwrap();
        assert_eq!(g.coordinate_name(0).unwrap(), "lat");
        assert_eq!(g.coordinate_units(1).unwrap(), "deg");
        assert!(g.with_coordinate_units(&["m"]).is_err());
    }

    #[test]
    fn corner_order_can_be_changed_on_lattices() {
        let g = raster_2x3()
            .with_corner_order(CornerOrder::CounterClockwise)
            .unwrap();
        assert_eq!(g.connectivity(), &[0, 3, 4, 1, 1, 4, 5, 2]);
        let mesh = GridTopology::unstructured(vec![vec![0.0, 1.0]], vec![0, 1], vec![2]).unwrap();
        assert!(mesh.with_corner_order(CornerOrder::Clockwise).is_err());
    }

    // ── Derived queries ─────────────────────────────────────────

    #[test]
    fn shared_cells_of_raster() {
        let g = raster_2x3();
        assert_eq!(g.shared_cells(0).unwrap(), &[0]);
        assert_eq!(g.shared_cells(1).unwrap(), &[0, 1]);
        assert_eq!(g.shared_cells(4).unwrap(), &[0, 1]);
        assert_eq!(g.shared_cells(5).unwrap(), &[1]);
        assert!(g.shared_cells(6).is_err());
    }

    #[test]
    fn centroids_are_vertex_means() {
        let g = raster_2x3();
        let c = g.cell_centroids();
        // Rows are axes (y, x); columns are cells.
        assert_eq!(c[0], vec![0.5, 0.5]);
        assert_eq!(c[1], vec![0.5, 1.5]);
    }

    #[test]
    fn point_in_cell_includes_boundary() {
        let g = raster_2x3();
        assert!(g.is_in_cell(0.5, 0.5, 0).unwrap());
        assert!(!g.is_in_cell(1.5, 0.5, 0).unwrap());
        assert!(g.is_in_cell(1.0, 0.5, 0).unwrap());
        assert!(g.is_in_cell(1.0, 0.5, 1).unwrap());
        assert!(g.is_in_cell(0.5, 0.5, 2).is_err());
    }

    #[test]
    fn point_in_cell_far_from_origin() {
        let o = 1.0e6;
        let g = GridTopology::raster(&[2, 3], &[1.0, 1.0], &[o, o]).unwrap();
        assert!(!g.is_in_cell(o + 2.5, o + 0.5, 1).unwrap());
        assert!(!g.is_in_cell(o + 0.5, o + 0.5, 1).unwrap());
        assert!(g.is_in_cell(o + 1.5, o + 0.5, 1).unwrap());
        assert!(g.is_in_cell(o + 2.0, o + 1.0, 1).unwrap());
    }

    #[test]
    fn contains_point_in_1d_and_3d() {
        let line = GridTopology::rectilinear(vec![vec![1.0, 3.0, 4.0]]).unwrap();
        assert!(line.contains_point(&[2.0], 0).unwrap());
        assert!(!line.contains_point(&[2.0], 1).unwrap());
        assert!(line.is_in_cell(2.0, 0.0, 0).is_err());

        let cube = GridTopology::raster(&[2, 2, 2], &[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]).unwrap();
        assert!(cube.contains_point(&[0.5, 0.5, 0.5], 0).unwrap());
        assert!(!cube.contains_point(&[0.5, 1.5, 0.5], 0).unwrap());
        assert!(cube.contains_point(&[0.5], 0).is_err());
    }

    // ── Compliance suites ───────────────────────────────────────

    #[test]
    fn compliance_raster_3d() {
        let g = GridTopology::raster(&[3, 4, 5], &[1.0, 2.0, 0.5], &[0.0, -1.0, 10.0]).unwrap();
        compliance::run_full_compliance(&g);
    }

    #[test]
    fn compliance_rectilinear() {
        let g = GridTopology::rectilinear(vec![vec![0.0, 1.0, 3.0], vec![-2.0, 0.0, 5.0, 6.0]])
            .unwrap();
        compliance::run_full_compliance(&g);
    }

    #[test]
    fn compliance_unstructured() {
        let g = GridTopology::unstructured(
            vec![vec![0.0, 0.0, 1.0, 1.0, 2.0], vec![0.0, 1.0, 0.0, 1.0, 0.5]],
            vec![0, 2, 3, 1, 2, 4, 3],
            vec![4, 7],
        )
        .unwrap();
        compliance::run_full_compliance(&g);
    }
}
