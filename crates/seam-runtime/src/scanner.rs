use std::sync::Arc;

use seam_blocks::FilterTable;
use seam_chunk::VoxelSnapshot;
use seam_world::{PARTITION_VOLUME, PartitionKey, WorldSource};

use crate::cache::{MeshCache, SnapshotChange};

/// Extra partitions kept beyond the scan radius before eviction.
pub const EVICTION_MARGIN: i64 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub visited: usize,
    pub unloaded: usize,
    pub stored: usize,
    pub unchanged: usize,
    pub dropped: usize,
}

/// Every offset of the cube `[-r, r]^3`, nearest first. Ties are ordered by
/// `(dy, dz, dx)` so the order is stable.
pub fn spiral_offsets(radius: i32) -> Vec<(i32, i32, i32)> {
    let r = radius.max(0);
    let mut out = Vec::with_capacity(((2 * r + 1) as usize).pow(3));
    for dy in -r..=r {
        for dz in -r..=r {
            for dx in -r..=r {
                out.push((dx, dy, dz));
            }
        }
    }
    out.sort_by_key(|&(dx, dy, dz)| (dx * dx + dy * dy + dz * dz, dy, dz, dx));
    out
}

/// Visits partitions around a moving reference a few at a time, keeping the cache's
/// snapshots current.
#[derive(Clone, Debug)]
pub struct PartitionScanner {
    radius: i32,
    order: Vec<(i32, i32, i32)>,
    cursor: usize,
}

impl PartitionScanner {
    pub fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        Self {
            radius,
            order: spiral_offsets(radius),
            cursor: 0,
        }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of partitions in one full pass.
    #[inline]
    pub fn pass_len(&self) -> usize {
        self.order.len()
    }

    /// Recomputes the visit order only when the radius actually changes.
    pub fn set_radius(&mut self, radius: i32) {
        let radius = radius.max(0);
        if radius == self.radius {
            return;
        }
        self.radius = radius;
        self.order = spiral_offsets(radius);
        self.cursor = 0;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Visits exactly `quota` partitions, continuing where the previous call stopped.
    ///
    /// Unloaded partitions, and those whose grid has the wrong size, are skipped and
    /// retried on the next pass. Partitions with no
    /// highlighted cells are dropped from the cache. Changed partitions get a new
    /// snapshot, which invalidates their geometry; nothing is rebuilt here.
    pub fn advance<W: WorldSource + ?Sized>(
        &mut self,
        quota: usize,
        reference: PartitionKey,
        world: &W,
        filter: &FilterTable,
        cache: &MeshCache,
    ) -> ScanReport {
        let mut report = ScanReport::default();
        if self.order.is_empty() {
            return report;
        }
        for _ in 0..quota {
            let (dx, dy, dz) = self.order[self.cursor];
            self.cursor = (self.cursor + 1) % self.order.len();
            let key = reference.offset(dx, dy, dz);
            report.visited += 1;
            if !world.is_partition_loaded(key) {
                report.unloaded += 1;
                continue;
            }
            let Some(grid) = world.type_grid(key) else {
                report.unloaded += 1;
                continue;
            };
            if grid.len() != PARTITION_VOLUME {
                // Malformed grids are retried like unloaded partitions; cached state stays.
                log::warn!(
                    target: "scan",
                    "partition ({}, {}, {}) returned {} cells, treated as unloaded",
                    key.px, key.py, key.pz, grid.len()
                );
                report.unloaded += 1;
                continue;
            }
            match VoxelSnapshot::capture(key, &grid, filter) {
                None => {
                    if cache.remove(key) {
                        report.dropped += 1;
                    }
                }
                Some(snapshot) => match cache.store_snapshot(Arc::new(snapshot)) {
                    SnapshotChange::Unchanged => report.unchanged += 1,
                    SnapshotChange::Inserted | SnapshotChange::Replaced => report.stored += 1,
                },
            }
        }
        log::debug!(
            target: "scan",
            "scan visited={} unloaded={} stored={} unchanged={} dropped={} cursor={}",
            report.visited,
            report.unloaded,
            report.stored,
            report.unchanged,
            report.dropped,
            self.cursor
        );
        report
    }

    /// Evicts everything farther than the scan radius plus [`EVICTION_MARGIN`].
    pub fn sweep(&self, reference: PartitionKey, cache: &MeshCache) -> usize {
        cache.evict_beyond(reference, i64::from(self.radius) + EVICTION_MARGIN)
    }
}
