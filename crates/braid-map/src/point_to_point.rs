//! Nearest-node transfer between two grids' points.
//!
//! Every destination point takes the value of the source point closest to
//! it. Grids must share a rank; class does not matter.

use crate::error::MapError;
use crate::kdtree::KdTree;
use crate::mapper::{check_buffers, incompatible, Mapper};
use braid_grid::GridTopology;

/// Point-centered → point-centered nearest-neighbour mapper.
#[derive(Clone, Debug, Default)]
pub struct PointToPoint {
    binding: Option<Binding>,
}

#[derive(Clone, Debug)]
struct Binding {
    src_len: usize,
    nearest: Vec<usize>,
}

impl PointToPoint {
    /// An unbound mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source point chosen for each destination point.
    pub fn nearest(&self) -> Option<&[usize]> {
        self.binding.as_ref().map(|b| b.nearest.as_slice())
    }
}

impl Mapper for PointToPoint {
    fn name(&self) -> &str {
        "PointToPoint"
    }

    fn test(&self, dst: &GridTopology, src: &GridTopology) -> bool {
        dst.dim() == src.dim() && src.point_count() > 0
    }

    fn initialize(&mut self, dst: &GridTopology, src: &GridTopology) -> Result<(), MapError> {
        if !self.test(dst, src) {
            return Err(incompatible(self, dst, src));
        }
        let tree = KdTree::new(src.coordinates());
        let mut nearest = Vec::with_capacity(dst.point_count());
        for point in 0..dst.point_count() {
            let query = dst.point(point)?;
            // Non-empty tree and matching rank were checked by `test`.
            nearest.push(tree.nearest(&query).unwrap_or(0));
        }
        tracing::debug!(
            mapper = self.name(),
            src_points = src.point_count(),
            dst_points = dst.point_count(),
            "mapper initialized"
        );
        self.binding = Some(Binding {
            src_len: src.point_count(),
            nearest,
        });
        Ok(())
    }

    fn sizes(&self) -> Option<(usize, usize)> {
        self.binding.as_ref().map(|b| (b.src_len, b.nearest.len()))
    }

    fn fill_value(&self, _bad_val: f64) -> f64 {
        0.0
    }

    fn run_into(&self, src: &[f64], dst: &mut [f64], bad_val: f64) -> Result<(), MapError> {
        check_buffers(self, src, dst)?;
        let Some(binding) = &self.binding else {
            return Err(MapError::NotInitialized {
                mapper: self.name().to_string(),
            });
        };
        for (out, &from) in dst.iter_mut().zip(&binding.nearest) {
            let v = src[from];
            if v > bad_val {
                *out = v;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_grids_round_trip() {
        let g = GridTopology::raster(&[3, 4], &[2.0, 1.0], &[0.0, -1.0]).unwrap();
        let mut m = PointToPoint::new();
        m.initialize(&g, &g).unwrap();
        let src: Vec<f64> = (0..12).map(|i| i as f64 * 1.5).collect();
        assert_eq!(m.run(&src, -1.0).unwrap(), src);
        assert_eq!(m.nearest().unwrap(), (0..12).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn bad_values_leave_destination_untouched() {
        let g = GridTopology::raster(&[1, 4], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
        let mut m = PointToPoint::new();
        m.initialize(&g, &g).unwrap();

        let src = [5.0, -999.0, -1000.0, 6.0];
        let mut dst = [1.0, 2.0, 3.0, 4.0];
        m.run_into(&src, &mut dst, -999.0).unwrap();
        assert_eq!(dst, [5.0, 2.0, 3.0, 6.0]);

        // A fresh buffer starts at zero.
        assert_eq!(m.run(&src, -999.0).unwrap(), vec![5.0, 0.0, 0.0, 6.0]);
    }

    #[test]
    fn coarse_to_fine_picks_closest_node() {
        let coarse = GridTopology::rectilinear(vec![vec![0.0, 10.0]]).unwrap();
        let fine = GridTopology::rectilinear(vec![vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]]).unwrap();
        let mut m = PointToPoint::new();
        m.initialize(&fine, &coarse).unwrap();
        assert_eq!(m.nearest().unwrap(), &[0, 0, 0, 1, 1, 1]);
        assert_eq!(
            m.run(&[1.0, 2.0], -1.0).unwrap(),
            vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]
        );
    }

    #[test]
    fn rank_mismatch_is_incompatible() {
        let line = GridTopology::raster(&[3], &[1.0], &[0.0]).unwrap();
        let plane = GridTopology::raster(&[3, 3], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
        let mut m = PointToPoint::new();
        let err = m.initialize(&plane, &line).unwrap_err();
        assert_eq!(
            err,
            MapError::IncompatibleGrid {
                mapper: "PointToPoint".to_string(),
                dst: braid_core::GridKind::Raster,
                src: braid_core::GridKind::Raster,
            }
        );
    }

    #[test]
    fn wrong_buffer_sizes_are_rejected() {
        let g = GridTopology::raster(&[2, 2], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
        let mut m = PointToPoint::new();
        m.initialize(&g, &g).unwrap();
        assert!(matches!(
            m.run(&[1.0; 3], 0.0),
            Err(MapError::SizeMismatch { what: "source", expected: 4, actual: 3 })
        ));
        assert!(matches!(
            m.run_into(&[1.0; 4], &mut [0.0; 5], 0.0),
            Err(MapError::SizeMismatch { what: "destination", .. })
        ));
    }

    proptest! {
        #[test]
        fn identity_on_unstructured_points(
            pts in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..40),
        ) {
            // Distinct points so the nearest neighbour is the point itself.
            let mut pts = pts;
            pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
            pts.dedup();
            let n = pts.len();
            let coords = vec![
                pts.iter().map(|p| p.0).collect::<Vec<_>>(),
                pts.iter().map(|p| p.1).collect::<Vec<_>>(),
            ];
            // One degenerate "cell" per node keeps the mesh valid.
            let g = GridTopology::unstructured(coords, (0..n).collect(), (1..=n).collect())
                .unwrap();
            let mut m = PointToPoint::new();
            m.initialize(&g, &g).unwrap();
            let src: Vec<f64> = (0..n).map(|i| i as f64).collect();
            prop_assert_eq!(m.run(&src, -1.0).unwrap(), src);
        }
    }
}
