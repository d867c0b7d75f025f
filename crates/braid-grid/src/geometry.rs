//! Computational-geometry predicates used by cell queries.
//!
//! Containment is closed: a point on an edge or vertex of a cell is
//! inside it. Edge tests allow a distance of `1e-12` times the local
//! extent (the edge length or the point's distance from the edge start,
//! whichever is larger), so they depend on cell size and not on where
//! the cell sits in the plane.

/// Relative tolerance for on-boundary tests.
const BOUNDARY_TOLERANCE: f64 = 1e-12;

/// Returns `true` if `(px, py)` lies on segment `a`–`b`.
pub fn on_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> bool {
    let (ax, ay) = a;
    let (bx, by) = b;
    let (dx, dy) = (bx - ax, by - ay);
    let (rx, ry) = (px - ax, py - ay);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return rx == 0.0 && ry == 0.0;
    }
    let len = len2.sqrt();
    // |cross| / len is the distance from the line; dot / len the
    // position along it.
    let slack = BOUNDARY_TOLERANCE * len * rx.hypot(ry).max(len);
    let cross = rx * dy - ry * dx;
    if cross.abs() > slack {
        return false;
    }
    let dot = rx * dx + ry * dy;
    dot >= -slack && dot <= len2 + slack
}

/// Closed point-in-polygon test ("contains or touches").
///
/// `ring` lists the polygon vertices in order; the closing edge from the
/// last vertex back to the first is implied. Rings with fewer than three
/// vertices contain nothing but their own boundary.
pub fn polygon_contains(px: f64, py: f64, ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n == 0 {
        return false;
    }
    for i in 0..n {
        if on_segment(px, py, ring[i], ring[(i + 1) % n]) {
            return true;
        }
    }
    if n < 3 {
        return false;
    }

    // Even-odd ray cast towards +x.
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) {
            let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closed interval test for 1-D cells.
pub fn segment_contains(p: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let slack = BOUNDARY_TOLERANCE * (hi - lo).abs().max(1.0);
    p >= lo - slack && p <= hi + slack
}

/// Closed axis-aligned bounding-box test.
///
/// `lo` and `hi` are per-axis bounds in the same axis order as `point`.
pub fn box_contains(point: &[f64], lo: &[f64], hi: &[f64]) -> bool {
    point
        .iter()
        .zip(lo.iter().zip(hi.iter()))
        .all(|(&p, (&l, &h))| segment_contains(p, l, h))
}

/// Arithmetic mean of a set of points given as per-axis iterators.
pub fn vertex_mean(points: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    points.sum::<f64>() / count as f64
}
