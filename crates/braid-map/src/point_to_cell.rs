//! Aggregation of point-centered source values into destination cells.
//!
//! Each source point is assigned to at most one destination cell: the
//! cell with the nearest centroid if it contains the point, otherwise the
//! first containing cell among those sharing a node with it. A run then
//! reduces the good values of each cell's points with a [`Reduction`].

use crate::error::MapError;
use crate::kdtree::KdTree;
use crate::mapper::{check_buffers, incompatible, Mapper};
use crate::reduce::Reduction;
use braid_grid::GridTopology;
use smallvec::SmallVec;

/// Point-centered → cell-centered aggregating mapper.
#[derive(Clone, Debug, Default)]
pub struct PointToCell {
    reduction: Reduction,
    binding: Option<Binding>,
}

/// Source points grouped by destination cell, in compressed-row form.
#[derive(Clone, Debug)]
struct Binding {
    src_len: usize,
    start: Vec<usize>,
    points: Vec<usize>,
    assigned: Vec<Option<usize>>,
}

impl Binding {
    fn cell_count(&self) -> usize {
        self.start.len() - 1
    }

    fn members(&self, cell: usize) -> &[usize] {
        &self.points[self.start[cell]..self.start[cell + 1]]
    }
}

impl PointToCell {
    /// An unbound mapper aggregating with [`Reduction::Mean`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `reduction` to combine values landing in one cell.
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// The active reduction.
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Destination cell of each source point, if any.
    pub fn assignments(&self) -> Option<&[Option<usize>]> {
        self.binding.as_ref().map(|b| b.assigned.as_slice())
    }

    fn locate(
        dst: &GridTopology,
        tree: &KdTree,
        query: &[f64],
    ) -> Result<Option<usize>, MapError> {
        let Some(candidate) = tree.nearest(query) else {
            return Ok(None);
        };
        if dst.contains_point(query, candidate)? {
            return Ok(Some(candidate));
        }
        let mut tried: SmallVec<[usize; 16]> = SmallVec::new();
        tried.push(candidate);
        for &node in dst.cell_nodes(candidate)? {
            for &cell in dst.shared_cells(node)? {
                if tried.contains(&cell) {
                    continue;
                }
                tried.push(cell);
                if dst.contains_point(query, cell)? {
                    return Ok(Some(cell));
                }
            }
        }
        Ok(None)
    }
}

impl Mapper for PointToCell {
    fn name(&self) -> &str {
        "PointToCell"
    }

    fn test(&self, dst: &GridTopology, src: &GridTopology) -> bool {
        dst.dim() == 2 && src.dim() == 2 && dst.min_nodes_per_cell().is_some_and(|n| n >= 3)
    }

    fn initialize(&mut self, dst: &GridTopology, src: &GridTopology) -> Result<(), MapError> {
        if !self.test(dst, src) {
            return Err(incompatible(self, dst, src));
        }
        let tree = KdTree::new(dst.cell_centroids());
        let mut assigned = Vec::with_capacity(src.point_count());
        let mut per_cell = vec![0usize; dst.cell_count()];
        for point in 0..src.point_count() {
            let query = src.point(point)?;
            let cell = Self::locate(dst, &tree, &query)?;
            if let Some(cell) = cell {
                per_cell[cell] += 1;
            }
            assigned.push(cell);
        }

        let mut start = Vec::with_capacity(per_cell.len() + 1);
        start.push(0);
        for count in &per_cell {
            start.push(start[start.len() - 1] + count);
        }
        let mut fill = start.clone();
        let mut points = vec![0; start[start.len() - 1]];
        for (point, cell) in assigned.iter().enumerate() {
            if let Some(&cell) = cell.as_ref() {
                points[fill[cell]] = point;
                fill[cell] += 1;
            }
        }

        let unassigned = assigned.iter().filter(|c| c.is_none()).count();
        let empty_cells = per_cell.iter().filter(|&&n| n == 0).count();
        tracing::debug!(
            mapper = self.name(),
            reduction = self.reduction.as_str(),
            src_points = src.point_count(),
            dst_cells = dst.cell_count(),
            unassigned,
            empty_cells,
            "mapper initialized"
        );
        self.binding = Some(Binding {
            src_len: src.point_count(),
            start,
            points,
            assigned,
        });
        Ok(())
    }

    fn sizes(&self) -> Option<(usize, usize)> {
        self.binding.as_ref().map(|b| (b.src_len, b.cell_count()))
    }

    fn run_into(&self, src: &[f64], dst: &mut [f64], bad_val: f64) -> Result<(), MapError> {
        check_buffers(self, src, dst)?;
        let Some(binding) = &self.binding else {
            return Err(MapError::NotInitialized {
                mapper: self.name().to_string(),
            });
        };
        let mut good: SmallVec<[f64; 16]> = SmallVec::new();
        for (cell, out) in dst.iter_mut().enumerate() {
            good.clear();
            good.extend(
                binding
                    .members(cell)
                    .iter()
                    .map(|&p| src[p])
                    .filter(|&v| v > bad_val),
            );
            if let Some(v) = self.reduction.apply(&good) {
                *out = v;
            }
        }
        Ok(())
    }
}
