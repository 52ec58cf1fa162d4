//! Immutable per-partition voxel snapshots.
#![forbid(unsafe_code)]

use seam_blocks::{AIR, BlockId, FilterTable};
use seam_world::{PARTITION_EDGE, PARTITION_VOLUME, PartitionKey, cell_index};

/// The highlighted content of one partition at the moment it was scanned.
///
/// Cells whose type is not in the filter are stored as [`AIR`], so two snapshots are
/// equal exactly when the highlighted cells and their types are equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelSnapshot {
    key: PartitionKey,
    cells: Box<[BlockId]>,
    filtered: usize,
}

impl VoxelSnapshot {
    /// Projects a raw type grid through `filter`. Returns `None` when no cell is
    /// filtered, or when `grid` does not hold exactly one partition of cells.
    pub fn capture(key: PartitionKey, grid: &[BlockId], filter: &FilterTable) -> Option<Self> {
        if grid.len() != PARTITION_VOLUME {
            log::warn!(
                target: "scan",
                "partition ({}, {}, {}) grid has {} cells, expected {}",
                key.px, key.py, key.pz, grid.len(), PARTITION_VOLUME
            );
            return None;
        }
        let mut cells = vec![AIR; PARTITION_VOLUME].into_boxed_slice();
        let mut filtered = 0usize;
        for (dst, &id) in cells.iter_mut().zip(grid) {
            if filter.is_filtered(id) {
                *dst = id;
                filtered += 1;
            }
        }
        if filtered == 0 {
            return None;
        }
        Some(Self {
            key,
            cells,
            filtered,
        })
    }

    #[inline]
    pub fn key(&self) -> PartitionKey {
        self.key
    }

    #[inline]
    pub fn cells(&self) -> &[BlockId] {
        &self.cells
    }

    /// Number of highlighted cells; always at least one.
    #[inline]
    pub fn filtered_count(&self) -> usize {
        self.filtered
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        cell_index(x, y, z)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.cells[cell_index(x, y, z)]
    }

    /// Like [`get_local`](Self::get_local), but `None` outside the partition.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        let e = PARTITION_EDGE as i32;
        if (0..e).contains(&x) && (0..e).contains(&y) && (0..e).contains(&z) {
            Some(self.get_local(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Local coordinates of every highlighted cell, in index order.
    pub fn filtered_cells(&self) -> impl Iterator<Item = (usize, usize, usize, BlockId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &id)| {
            if id == AIR {
                return None;
            }
            let x = i % PARTITION_EDGE;
            let z = (i / PARTITION_EDGE) % PARTITION_EDGE;
            let y = i / (PARTITION_EDGE * PARTITION_EDGE);
            Some((x, y, z, id))
        })
    }
}
