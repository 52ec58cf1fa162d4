use std::collections::BTreeMap;

use seam_blocks::{FilterTable, Rgba};
use seam_chunk::VoxelSnapshot;
use seam_geom::Vec3;
use seam_world::PARTITION_EDGE;

use crate::face::Axis;
use crate::mesh::Line;

type Delta = (i32, i32, i32);

const BELOW: Delta = (0, -1, 0);
const ABOVE: Delta = (0, 1, 0);
const NORTH: Delta = (0, 0, -1);
const SOUTH: Delta = (0, 0, 1);
const WEST: Delta = (-1, 0, 0);
const EAST: Delta = (1, 0, 0);

/// The twelve edges of a unit cell: axis, start corner offset, and the two
/// face-neighbors that share the edge.
const CELL_EDGES: [(Axis, Delta, Delta, Delta); 12] = [
    (Axis::X, (0, 0, 0), BELOW, NORTH),
    (Axis::X, (0, 1, 0), ABOVE, NORTH),
    (Axis::X, (0, 0, 1), BELOW, SOUTH),
    (Axis::X, (0, 1, 1), ABOVE, SOUTH),
    (Axis::Y, (0, 0, 0), WEST, NORTH),
    (Axis::Y, (1, 0, 0), EAST, NORTH),
    (Axis::Y, (0, 0, 1), WEST, SOUTH),
    (Axis::Y, (1, 0, 1), EAST, SOUTH),
    (Axis::Z, (0, 0, 0), WEST, BELOW),
    (Axis::Z, (1, 0, 0), EAST, BELOW),
    (Axis::Z, (0, 1, 0), WEST, ABOVE),
    (Axis::Z, (1, 1, 0), EAST, ABOVE),
];

const POINTS: usize = PARTITION_EDGE + 1;

#[inline]
fn claim_index(axis: Axis, x: usize, y: usize, z: usize) -> usize {
    ((axis.index() * POINTS + y) * POINTS + z) * POINTS + x
}

/// Run grouping key: axis, the two constant local coordinates, color.
type RunKey = (Axis, usize, usize, Rgba);

/// Boundary edges of every highlighted cell, merged into maximal collinear runs.
///
/// An edge is kept when at least one of its two face-neighbors is absent or has a
/// different color. The first cell in index order to claim an edge decides its color.
pub fn edge_lines(snapshot: &VoxelSnapshot, filter: &FilterTable) -> Vec<Line> {
    let mut claimed = vec![false; 3 * POINTS * POINTS * POINTS];
    let mut runs: BTreeMap<RunKey, Vec<usize>> = BTreeMap::new();
    let color_at = |x: usize, y: usize, z: usize, d: Delta| {
        snapshot
            .get(x as i32 + d.0, y as i32 + d.1, z as i32 + d.2)
            .and_then(|id| filter.color_of(id))
    };
    for (x, y, z, id) in snapshot.filtered_cells() {
        let Some(color) = filter.color_of(id) else {
            continue;
        };
        for &(axis, off, n1, n2) in &CELL_EDGES {
            let c1 = color_at(x, y, z, n1);
            let c2 = color_at(x, y, z, n2);
            if c1 == Some(color) && c2 == Some(color) {
                continue;
            }
            let (sx, sy, sz) = (x + off.0 as usize, y + off.1 as usize, z + off.2 as usize);
            let slot = claim_index(axis, sx, sy, sz);
            if claimed[slot] {
                continue;
            }
            claimed[slot] = true;
            let edge_color = match (c1, c2) {
                (Some(c), _) if c != color => color.average(c),
                (_, Some(c)) if c != color => color.average(c),
                _ => color,
            };
            let (along, key) = match axis {
                Axis::X => (sx, (axis, sy, sz, edge_color)),
                Axis::Y => (sy, (axis, sx, sz, edge_color)),
                Axis::Z => (sz, (axis, sx, sy, edge_color)),
            };
            runs.entry(key).or_default().push(along);
        }
    }

    let (ox, oy, oz) = snapshot.key().origin();
    let world = |x: usize, y: usize, z: usize| {
        Vec3::new(
            (ox + x as i32) as f32,
            (oy + y as i32) as f32,
            (oz + z as i32) as f32,
        )
    };
    let mut lines = Vec::new();
    for ((axis, a, b, color), mut starts) in runs {
        starts.sort_unstable();
        let mut i = 0;
        while i < starts.len() {
            let begin = starts[i];
            let mut end = begin + 1;
            i += 1;
            while i < starts.len() && starts[i] == end {
                end += 1;
                i += 1;
            }
            let (start, stop) = match axis {
                Axis::X => (world(begin, a, b), world(end, a, b)),
                Axis::Y => (world(a, begin, b), world(a, end, b)),
                Axis::Z => (world(a, b, begin), world(a, b, end)),
            };
            lines.push(Line {
                start,
                end: stop,
                color,
                axis,
            });
        }
    }
    lines
}
