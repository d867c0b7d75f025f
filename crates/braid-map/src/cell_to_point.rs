//! Transfer of cell-centered source values onto destination points.
//!
//! Each destination point is located in a source cell by finding the
//! nearest source node and testing the cells that share it. Points that
//! fall in no such cell are left alone on every run.

use crate::error::MapError;
use crate::kdtree::KdTree;
use crate::mapper::{check_buffers, incompatible, Mapper};
use braid_grid::GridTopology;

/// Cell-centered → point-centered mapper.
#[derive(Clone, Debug, Default)]
pub struct CellToPoint {
    binding: Option<Binding>,
}

#[derive(Clone, Debug)]
struct Binding {
    src_len: usize,
    containing: Vec<Option<usize>>,
}

impl CellToPoint {
    /// An unbound mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source cell containing each destination point, if any.
    pub fn containing_cells(&self) -> Option<&[Option<usize>]> {
        self.binding.as_ref().map(|b| b.containing.as_slice())
    }
}

impl Mapper for CellToPoint {
    fn name(&self) -> &str {
        "CellToPoint"
    }

    fn test(&self, dst: &GridTopology, src: &GridTopology) -> bool {
        dst.dim() == src.dim()
            && src.dim() <= 2
            && src
                .min_nodes_per_cell()
                .is_some_and(|n| n > src.dim())
    }

    fn initialize(&mut self, dst: &GridTopology, src: &GridTopology) -> Result<(), MapError> {
        if !self.test(dst, src) {
            return Err(incompatible(self, dst, src));
        }
        let tree = KdTree::new(src.coordinates());
        let mut containing = Vec::with_capacity(dst.point_count());
        for point in 0..dst.point_count() {
            let query = dst.point(point)?;
            let mut found = None;
            if let Some(node) = tree.nearest(&query) {
                for &cell in src.shared_cells(node)? {
                    if src.contains_point(&query, cell)? {
                        found = Some(cell);
                        break;
                    }
                }
            }
            containing.push(found);
        }
        let unmatched = containing.iter().filter(|c| c.is_none()).count();
        tracing::debug!(
            mapper = self.name(),
            src_cells = src.cell_count(),
            dst_points = dst.point_count(),
            unmatched,
            "mapper initialized"
        );
        self.binding = Some(Binding {
            src_len: src.cell_count(),
            containing,
        });
        Ok(())
    }

    fn sizes(&self) -> Option<(usize, usize)> {
        self.binding.as_ref().map(|b| (b.src_len, b.containing.len()))
    }

    fn run_into(&self, src: &[f64], dst: &mut [f64], bad_val: f64) -> Result<(), MapError> {
        check_buffers(self, src, dst)?;
        let Some(binding) = &self.binding else {
            return Err(MapError::NotInitialized {
                mapper: self.name().to_string(),
            });
        };
        for (out, cell) in dst.iter_mut().zip(&binding.containing) {
            if let Some(&cell) = cell.as_ref() {
                let v = src[cell];
                if v > bad_val {
                    *out = v;
                }
            }
        }
        Ok(())
    }
}
