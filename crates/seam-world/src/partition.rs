use std::cmp::Ordering;

use seam_geom::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

/// Cells along one edge of a partition.
pub const PARTITION_EDGE: usize = 16;
pub const PARTITION_VOLUME: usize = PARTITION_EDGE * PARTITION_EDGE * PARTITION_EDGE;

const EDGE_I32: i32 = PARTITION_EDGE as i32;

/// Linear index of a local cell, `(y * 16 + z) * 16 + x`.
#[inline]
pub const fn cell_index(x: usize, y: usize, z: usize) -> usize {
    (y * PARTITION_EDGE + z) * PARTITION_EDGE + x
}

/// A 16x16x16 cubic region of the world, in partition units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKey {
    pub px: i32,
    pub py: i32,
    pub pz: i32,
}

impl PartitionKey {
    #[inline]
    pub const fn new(px: i32, py: i32, pz: i32) -> Self {
        Self { px, py, pz }
    }

    /// Partition holding the world cell `(x, y, z)`.
    #[inline]
    pub fn containing(x: i32, y: i32, z: i32) -> Self {
        Self::new(
            x.div_euclid(EDGE_I32),
            y.div_euclid(EDGE_I32),
            z.div_euclid(EDGE_I32),
        )
    }

    /// Partition holding a world-space position.
    #[inline]
    pub fn containing_point(p: Vec3) -> Self {
        Self::containing(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            px: self.px + dx,
            py: self.py + dy,
            pz: self.pz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: PartitionKey) -> i64 {
        let dx = i64::from(self.px - other.px);
        let dy = i64::from(self.py - other.py);
        let dz = i64::from(self.pz - other.pz);
        dx * dx + dy * dy + dz * dz
    }

    /// `max(|dx|, |dy|, |dz|)`; the scan and eviction extent is a cube in this metric.
    #[inline]
    pub fn chebyshev_distance(self, other: PartitionKey) -> i64 {
        let dx = i64::from(self.px - other.px).abs();
        let dy = i64::from(self.py - other.py).abs();
        let dz = i64::from(self.pz - other.pz).abs();
        dx.max(dy).max(dz)
    }

    /// World cell of the minimum corner.
    #[inline]
    pub fn origin(self) -> (i32, i32, i32) {
        (self.px * EDGE_I32, self.py * EDGE_I32, self.pz * EDGE_I32)
    }

    #[inline]
    pub fn bounds(self) -> Aabb {
        let (x, y, z) = self.origin();
        let min = Vec3::new(x as f32, y as f32, z as f32);
        let e = PARTITION_EDGE as f32;
        Aabb::new(min, min + Vec3::new(e, e, e))
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        self.bounds().center()
    }

    /// Orders by squared distance to `reference`, then `(y, z, x)`.
    pub fn cmp_from(self, other: PartitionKey, reference: PartitionKey) -> Ordering {
        self.distance_sq(reference)
            .cmp(&other.distance_sq(reference))
            .then_with(|| self.cmp(&other))
    }
}

impl Ord for PartitionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.py, self.pz, self.px).cmp(&(other.py, other.pz, other.px))
    }
}

impl PartialOrd for PartitionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32, i32)> for PartitionKey {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<PartitionKey> for (i32, i32, i32) {
    fn from(value: PartitionKey) -> Self {
        (value.px, value.py, value.pz)
    }
}
