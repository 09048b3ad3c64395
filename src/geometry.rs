//! Hex-grid coordinate math.
//!
//! Everything here is a pure function of a hex index, the grid orientation and
//! the fixed hex radius: pixel centers, the six polygon corners, and logical
//! neighbor indices. None of these functions know the grid extent; callers
//! that care about bounds (the document store, flood fill) check ranges
//! themselves.

use crate::constants::HEX_RADIUS;
use crate::types::{HexIndex, Orientation};

/// Rounds a coordinate to two decimal places so that vertex positions are
/// bit-stable across recomputation and export.
fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Computes the pixel center of the hex at `index`.
///
/// Under [`Orientation::Horizontal`], columns advance by 1.5·R on the x axis
/// and odd columns sit half a hex lower; under [`Orientation::Vertical`] the
/// axes swap roles and odd rows are shifted half a hex to the right. The
/// stagger is what lets offset-coordinate hexes tile without gaps.
pub fn hex_center(index: HexIndex, orientation: Orientation) -> (f32, f32) {
    let c = index.col as f32;
    let r = index.row as f32;
    let sqrt3 = 3.0_f32.sqrt();
    match orientation {
        Orientation::Horizontal => {
            let x = HEX_RADIUS * 1.5 * c;
            let y = HEX_RADIUS * sqrt3 * (r + 0.5 * (index.col % 2) as f32);
            (x, y)
        }
        Orientation::Vertical => {
            let x = HEX_RADIUS * sqrt3 * (c + 0.5 * (index.row % 2) as f32);
            let y = HEX_RADIUS * 1.5 * r;
            (x, y)
        }
    }
}

/// Computes the six polygon corners of the hex at `index`, rounded to two
/// decimals.
///
/// Corner `i` sits at angle i·60°. The horizontal layout sweeps with
/// (cos, sin) and the vertical layout with (sin, cos), which rotates the
/// polygon by 30° so its flat edges line up with the tiling in both
/// orientations. Output is fully determined by the inputs.
pub fn hex_vertices(index: HexIndex, orientation: Orientation) -> [(f32, f32); 6] {
    let (x, y) = hex_center(index, orientation);
    let mut points = [(0.0, 0.0); 6];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = std::f32::consts::PI / 3.0 * i as f32;
        *point = match orientation {
            Orientation::Horizontal => (
                round2(x + HEX_RADIUS * angle.cos()),
                round2(y + HEX_RADIUS * angle.sin()),
            ),
            Orientation::Vertical => (
                round2(x + HEX_RADIUS * angle.sin()),
                round2(y + HEX_RADIUS * angle.cos()),
            ),
        };
    }
    points
}

/// Returns the six logical neighbors of `index`.
///
/// In the horizontal layout a hex always touches the cells directly above and
/// below it, plus two cells in each adjacent column; which two depends on
/// whether this column is staggered up or down, hence the parity-keyed
/// offset. The vertical layout is the same picture with columns and rows
/// swapped. Results may lie outside any particular grid; callers filter.
pub fn neighbors(index: HexIndex, orientation: Orientation) -> [HexIndex; 6] {
    let HexIndex { col: c, row: r } = index;
    match orientation {
        Orientation::Horizontal => {
            let offset = if c % 2 == 0 { -1 } else { 1 };
            [
                // up and down
                HexIndex::new(c, r - 1),
                HexIndex::new(c, r + 1),
                // two to the left
                HexIndex::new(c - 1, r),
                HexIndex::new(c - 1, r + offset),
                // two to the right
                HexIndex::new(c + 1, r),
                HexIndex::new(c + 1, r + offset),
            ]
        }
        Orientation::Vertical => {
            let offset = if r % 2 == 0 { -1 } else { 1 };
            [
                // left and right
                HexIndex::new(c - 1, r),
                HexIndex::new(c + 1, r),
                // two above
                HexIndex::new(c, r - 1),
                HexIndex::new(c + offset, r - 1),
                // two below
                HexIndex::new(c, r + 1),
                HexIndex::new(c + offset, r + 1),
            ]
        }
    }
}

/// Squared Euclidean distance between two points.
pub fn distance_squared(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Squared distance from point `p` to the line segment `a`-`b`, used for
/// hit-testing drawn lines under the eraser.
pub fn segment_distance_squared(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let length2 = abx * abx + aby * aby;
    if length2 == 0.0 {
        return distance_squared(a, p);
    }
    let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / length2).clamp(0.0, 1.0);
    distance_squared((a.0 + t * abx, a.1 + t * aby), p)
}

/// Returns the corner slot (0..6) of `vertices` closest to `point`.
pub fn nearest_vertex_slot(vertices: &[(f32, f32); 6], point: (f32, f32)) -> u8 {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (i, v) in vertices.iter().enumerate() {
        let distance = distance_squared(*v, point);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EDGE_TOLERANCE, HEX_RADIUS_SQUARED};

    #[test]
    fn test_horizontal_centers_stagger_odd_columns() {
        let sqrt3 = 3.0_f32.sqrt();
        let even = hex_center(HexIndex::new(2, 1), Orientation::Horizontal);
        assert_eq!(even.0, HEX_RADIUS * 3.0);
        assert_eq!(even.1, HEX_RADIUS * sqrt3);

        let odd = hex_center(HexIndex::new(3, 1), Orientation::Horizontal);
        assert_eq!(odd.0, HEX_RADIUS * 4.5);
        assert_eq!(odd.1, HEX_RADIUS * sqrt3 * 1.5);
    }

    #[test]
    fn test_vertical_centers_stagger_odd_rows() {
        let sqrt3 = 3.0_f32.sqrt();
        let even = hex_center(HexIndex::new(1, 2), Orientation::Vertical);
        assert_eq!(even.0, HEX_RADIUS * sqrt3);
        assert_eq!(even.1, HEX_RADIUS * 3.0);

        let odd = hex_center(HexIndex::new(1, 3), Orientation::Vertical);
        assert_eq!(odd.0, HEX_RADIUS * sqrt3 * 1.5);
        assert_eq!(odd.1, HEX_RADIUS * 4.5);
    }

    #[test]
    fn test_vertices_are_deterministic() {
        let index = HexIndex::new(4, 7);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let a = hex_vertices(index, orientation);
            let b = hex_vertices(index, orientation);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_vertices_sit_on_the_radius() {
        let index = HexIndex::new(5, 5);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let center = hex_center(index, orientation);
            for v in hex_vertices(index, orientation) {
                let d = distance_squared(center, v);
                assert!(
                    (d - HEX_RADIUS_SQUARED).abs() < EDGE_TOLERANCE,
                    "corner {:?} is off the radius (d² = {})",
                    v,
                    d
                );
            }
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for c in 0..6 {
                for r in 0..6 {
                    let i = HexIndex::new(c, r);
                    for j in neighbors(i, orientation) {
                        assert!(
                            neighbors(j, orientation).contains(&i),
                            "{:?} lists {:?} but not vice versa ({:?})",
                            i,
                            j,
                            orientation
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_neighbors_are_distinct() {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let ns = neighbors(HexIndex::new(3, 3), orientation);
            for (i, a) in ns.iter().enumerate() {
                for b in &ns[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_neighbor_centers_are_one_hex_apart() {
        // every true neighbor's center is exactly √3·R away (the hex "height")
        let expected = 3.0 * HEX_RADIUS_SQUARED;
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let i = HexIndex::new(4, 4);
            let center = hex_center(i, orientation);
            for n in neighbors(i, orientation) {
                let d = distance_squared(center, hex_center(n, orientation));
                assert!(
                    (d - expected).abs() < 1.0,
                    "{:?} -> {:?}: d² = {}, expected {}",
                    i,
                    n,
                    d,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_segment_distance_endpoints_and_midpoint() {
        let a = (0.0, 0.0);
        let b = (10.0, 0.0);
        assert_eq!(segment_distance_squared(a, b, (5.0, 0.0)), 0.0);
        assert_eq!(segment_distance_squared(a, b, (5.0, 3.0)), 9.0);
        // beyond the endpoints the nearest point is the endpoint itself
        assert_eq!(segment_distance_squared(a, b, (-4.0, 0.0)), 16.0);
        // degenerate zero-length segment
        assert_eq!(segment_distance_squared(a, a, (3.0, 4.0)), 25.0);
    }

    #[test]
    fn test_nearest_vertex_slot_picks_the_closest_corner() {
        let index = HexIndex::new(2, 2);
        let vertices = hex_vertices(index, Orientation::Horizontal);
        for (slot, v) in vertices.iter().enumerate() {
            // probe slightly inward from each corner
            let center = hex_center(index, Orientation::Horizontal);
            let probe = (v.0 * 0.9 + center.0 * 0.1, v.1 * 0.9 + center.1 * 0.1);
            assert_eq!(nearest_vertex_slot(&vertices, probe), slot as u8);
        }
    }
}
