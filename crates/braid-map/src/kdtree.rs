//! Exact nearest-neighbour search over a static point set.
//!
//! The tree is implicit: a permutation of point indices arranged so that
//! the middle element of every sub-range is the splitting point for that
//! range, with the splitting axis cycling with depth. No per-node
//! allocation.

/// A k-d tree over 1-D to 3-D points.
///
/// # Examples
///
/// ```
/// use braid_map::KdTree;
///
/// // Rows are axes, columns are points.
/// let tree = KdTree::new(&[vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]);
/// assert_eq!(tree.nearest(&[0.9, 0.2]), Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct KdTree {
    dim: usize,
    points: Vec<f64>,
    order: Vec<usize>,
}

#[derive(Clone, Copy)]
struct Best {
    dist2: f64,
    index: usize,
}

impl Best {
    fn offer(&mut self, dist2: f64, index: usize) {
        if dist2 < self.dist2 || (dist2 == self.dist2 && index < self.index) {
            self.dist2 = dist2;
            self.index = index;
        }
    }
}

impl KdTree {
    /// Build a tree from per-axis coordinate rows.
    ///
    /// Every row must have the same length; that length is the number of
    /// points.
    pub fn new(coords: &[Vec<f64>]) -> Self {
        let dim = coords.len();
        let len = coords.first().map_or(0, Vec::len);
        let mut points = Vec::with_capacity(dim * len);
        for i in 0..len {
            points.extend(coords.iter().map(|row| row[i]));
        }
        let mut order: Vec<usize> = (0..len).collect();
        if dim > 0 {
            build(&mut order, &points, dim, 0);
        }
        Self { dim, points, order }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the tree indexes no points.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of axes.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Index of the point closest to `query`.
    ///
    /// Equidistant candidates resolve to the lowest index. Returns `None`
    /// for an empty tree or a query of the wrong rank.
    pub fn nearest(&self, query: &[f64]) -> Option<usize> {
        self.nearest_with_distance(query).map(|(i, _)| i)
    }

    /// Index of the closest point and its squared Euclidean distance.
    pub fn nearest_with_distance(&self, query: &[f64]) -> Option<(usize, f64)> {
        if self.is_empty() || query.len() != self.dim {
            return None;
        }
        let mut best = Best {
            dist2: f64::INFINITY,
            index: usize::MAX,
        };
        self.search(&self.order, 0, query, &mut best);
        (best.index != usize::MAX).then_some((best.index, best.dist2))
    }

    fn point(&self, index: usize) -> &[f64] {
        &self.points[index * self.dim..(index + 1) * self.dim]
    }

    fn search(&self, order: &[usize], depth: usize, query: &[f64], best: &mut Best) {
        if order.is_empty() {
            return;
        }
        let mid = order.len() / 2;
        let index = order[mid];
        let p = self.point(index);
        best.offer(dist2(p, query), index);

        let axis = depth % self.dim;
        let diff = query[axis] - p[axis];
        let (near, far) = if diff < 0.0 {
            (&order[..mid], &order[mid + 1..])
        } else {
            (&order[mid + 1..], &order[..mid])
        };
        self.search(near, depth + 1, query, best);
        // `<=` so that equidistant points across the split are still seen.
        if diff * diff <= best.dist2 {
            self.search(far, depth + 1, query, best);
        }
    }
}

fn build(order: &mut [usize], points: &[f64], dim: usize, depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % dim;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| {
        points[a * dim + axis]
            .total_cmp(&points[b * dim + axis])
            .then(a.cmp(&b))
    });
    let (left, rest) = order.split_at_mut(mid);
    build(left, points, dim, depth + 1);
    build(&mut rest[1..], points, dim, depth + 1);
}

fn dist2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(coords: &[Vec<f64>], query: &[f64]) -> usize {
        let len = coords[0].len();
        let mut best = (f64::INFINITY, usize::MAX);
        for i in 0..len {
            let d: f64 = coords
                .iter()
                .zip(query)
                .map(|(row, q)| (row[i] - q) * (row[i] - q))
                .sum();
            if d < best.0 {
                best = (d, i);
            }
        }
        best.1
    }

    #[test]
    fn empty_tree_has_no_neighbour() {
        let tree = KdTree::new(&[Vec::new(), Vec::new()]);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(&[0.0, 0.0]), None);
    }

    #[test]
    fn wrong_rank_query_is_rejected() {
        let tree = KdTree::new(&[vec![0.0, 1.0]]);
        assert_eq!(tree.nearest(&[0.0, 0.0]), None);
        assert_eq!(tree.nearest(&[0.8]), Some(1));
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        // Four corners of a unit square, queried at its center.
        let tree = KdTree::new(&[vec![1.0, 0.0, 1.0, 0.0], vec![1.0, 1.0, 0.0, 0.0]]);
        assert_eq!(tree.nearest(&[0.5, 0.5]), Some(0));
        // Duplicated points.
        let tree = KdTree::new(&[vec![2.0, 5.0, 5.0, 5.0]]);
        assert_eq!(tree.nearest(&[5.0]), Some(1));
    }

    #[test]
    fn exact_hit_has_zero_distance() {
        let tree = KdTree::new(&[vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0], vec![6.0, 7.0, 8.0]]);
        assert_eq!(tree.nearest_with_distance(&[1.0, 4.0, 7.0]), Some((1, 0.0)));
    }

    proptest! {
        #[test]
        fn matches_brute_force(
            points in prop::collection::vec((-50i32..50, -50i32..50), 1..60),
            qx in -60i32..60,
            qy in -60i32..60,
        ) {
            // Integer lattice points make exact ties common.
            let coords = vec![
                points.iter().map(|p| p.0 as f64).collect::<Vec<_>>(),
                points.iter().map(|p| p.1 as f64).collect::<Vec<_>>(),
            ];
            let tree = KdTree::new(&coords);
            let query = [qx as f64, qy as f64];
            prop_assert_eq!(tree.nearest(&query), Some(brute_force(&coords, &query)));
        }
    }
}
